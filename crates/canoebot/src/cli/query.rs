//! One-shot lookup command handlers.

use canoebot::{
    BookingCache, BotCommand, CanoebotResult, CommandError, CommandErrorKind, CommandHandler,
    TableSource, parse_date,
};
use chrono::Local;

/// Handle the `facilities` command.
pub fn list_facilities<S: TableSource + 'static>(cache: &BookingCache<S>) {
    print!("{}", cache.facilities().show_table());
}

/// Handle the `query` command.
pub async fn query<S: TableSource + 'static>(
    cache: BookingCache<S>,
    facility: &str,
    date: Option<&str>,
    refresh: bool,
) -> CanoebotResult<()> {
    let facility = find_facility(&cache, facility)?;
    let date = parse_date(date.unwrap_or_default(), Local::now().date_naive());

    let command = if refresh {
        BotCommand::SrcRefresh { facility, date }
    } else {
        BotCommand::Src { facility, date }
    };

    println!("{}", CommandHandler::new(cache).reply(command).await);
    Ok(())
}

/// Handle the `slots` command.
pub async fn list_slots<S: TableSource + 'static>(
    cache: BookingCache<S>,
    facility: &str,
) -> CanoebotResult<()> {
    let facility = find_facility(&cache, facility)?;
    let command = BotCommand::Slots { facility };
    println!("{}", CommandHandler::new(cache).reply(command).await);
    Ok(())
}

fn find_facility<S: TableSource + 'static>(
    cache: &BookingCache<S>,
    query: &str,
) -> Result<usize, CommandError> {
    cache
        .facilities()
        .find(query)
        .ok_or_else(|| CommandError::new(CommandErrorKind::UnknownFacility(query.to_string())))
}
