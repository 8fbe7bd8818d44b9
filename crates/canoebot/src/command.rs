//! Text commands answered from the booking cache.
//!
//! Commands arrive as single lines (`/src badminton tomorrow`), are parsed
//! against the facility table, and always produce a reply. Cache failures
//! collapse to one apology; lookups never expose fetch errors to users.

use crate::{RefreshTrigger, parse_date};
use canoebot_error::{CanoebotResult, CommandError, CommandErrorKind};
use canoebot_src::{BookingCache, Facilities, FacilityId, TableSource};
use chrono::{Local, NaiveDate};
use tracing::{debug, info, instrument, warn};

/// Reply sent whenever booking data cannot be produced.
pub const UNAVAILABLE_REPLY: &str = "SRC data unavailable, try again later.";

const HELP: &str = "\
/src <facility> [date]         availability for a day
/srcrefresh <facility> [date]  re-fetch, then show availability
/slots <facility>              hour labels of a facility
/facilities                    list facilities
/status                        cache contents
/help                          this message";

/// A parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    /// Availability of a facility on a date
    Src {
        /// Facility id
        facility: FacilityId,
        /// Requested date
        date: NaiveDate,
    },
    /// Refresh the covering line, then show availability
    SrcRefresh {
        /// Facility id
        facility: FacilityId,
        /// Requested date
        date: NaiveDate,
    },
    /// Hour labels of a facility
    Slots {
        /// Facility id
        facility: FacilityId,
    },
    /// Numbered facility list
    Facilities,
    /// Cache line dump
    Status,
    /// Command list
    Help,
}

impl BotCommand {
    /// Parse one input line.
    ///
    /// The facility is the first argument (number, code or name); anything
    /// after it is the date, which falls back to `today` when unreadable.
    pub fn parse(line: &str, facilities: &Facilities, today: NaiveDate) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or_default();
        // strip a bot mention, e.g. /src@canoebot
        let name = name.split('@').next().unwrap_or(name).to_lowercase();

        match name.as_str() {
            "/src" | "/srcrefresh" => {
                let facility = facility_arg(&name, words.next(), facilities)?;
                let date = parse_date(&words.collect::<Vec<_>>().join(" "), today);

                Ok(if name == "/src" {
                    Self::Src { facility, date }
                } else {
                    Self::SrcRefresh { facility, date }
                })
            }
            "/slots" => Ok(Self::Slots {
                facility: facility_arg(&name, words.next(), facilities)?,
            }),
            "/facilities" => Ok(Self::Facilities),
            "/status" => Ok(Self::Status),
            "/help" | "/start" => Ok(Self::Help),
            _ => Err(CommandError::new(CommandErrorKind::CommandNotFound(name))),
        }
    }
}

fn facility_arg(
    command: &str,
    query: Option<&str>,
    facilities: &Facilities,
) -> Result<FacilityId, CommandError> {
    let query = query.ok_or_else(|| {
        CommandError::new(CommandErrorKind::MissingArgument {
            command: command.to_string(),
            arg_name: "facility".to_string(),
        })
    })?;
    facilities
        .find(query)
        .ok_or_else(|| CommandError::new(CommandErrorKind::UnknownFacility(query.to_string())))
}

/// Reply text for a command that could not be parsed.
pub fn command_error_reply(error: &CommandError) -> String {
    match error.kind() {
        CommandErrorKind::CommandNotFound(name) if name.is_empty() => HELP.to_string(),
        CommandErrorKind::CommandNotFound(name) => {
            format!("Unknown command '{}'.\n\n{}", name, HELP)
        }
        CommandErrorKind::MissingArgument { command, arg_name } => {
            format!("Usage: {} <{}> [date]", command, arg_name)
        }
        CommandErrorKind::UnknownFacility(query) => {
            format!("No facility matches '{}'. Try /facilities.", query)
        }
    }
}

/// Answers text commands from a shared booking cache.
pub struct CommandHandler<S> {
    cache: BookingCache<S>,
    refresher: Option<RefreshTrigger>,
}

impl<S: TableSource + 'static> CommandHandler<S> {
    /// Handler over a cache handle.
    pub fn new(cache: BookingCache<S>) -> Self {
        Self {
            cache,
            refresher: None,
        }
    }

    /// Queue a background refresh pass on every `/src` lookup.
    pub fn with_refresher(mut self, refresher: RefreshTrigger) -> Self {
        self.refresher = Some(refresher);
        self
    }

    /// The cache behind this handler.
    pub fn cache(&self) -> &BookingCache<S> {
        &self.cache
    }

    /// Reply to one input line.
    #[instrument(skip(self))]
    pub async fn handle(&self, line: &str) -> String {
        let today = Local::now().date_naive();
        let command = match BotCommand::parse(line, self.cache.facilities(), today) {
            Ok(command) => command,
            Err(error) => {
                debug!(%error, "Rejected command");
                return command_error_reply(&error);
            }
        };

        self.reply(command).await
    }

    /// Reply to a parsed command; failures become [`UNAVAILABLE_REPLY`].
    #[instrument(skip(self))]
    pub async fn reply(&self, command: BotCommand) -> String {
        match self.execute(command).await {
            Ok(reply) => reply,
            Err(error) => {
                warn!(%error, "Command failed");
                UNAVAILABLE_REPLY.to_string()
            }
        }
    }

    /// Run a parsed command.
    pub async fn execute(&self, command: BotCommand) -> CanoebotResult<String> {
        match command {
            BotCommand::Src { facility, date } => {
                let reply = self.availability(facility, date).await;
                if let Some(refresher) = &self.refresher {
                    refresher.trigger();
                }
                reply
            }
            BotCommand::SrcRefresh { facility, date } => {
                match self.cache.refresh_date(date, facility).await {
                    Ok(true) => info!(facility, %date, "Refreshed on request"),
                    Ok(false) => debug!(facility, %date, "Nothing to refresh"),
                    // the line keeps its previous table
                    Err(error) => warn!(facility, %date, %error, "Requested refresh failed"),
                }
                self.availability(facility, date).await
            }
            BotCommand::Slots { facility } => {
                Ok(self.cache.get_time_slots(facility).await?.join("\n"))
            }
            BotCommand::Facilities => Ok(self.cache.facilities().show_table()),
            BotCommand::Status => Ok(self.cache.status_table()),
            BotCommand::Help => Ok(HELP.to_string()),
        }
    }

    async fn availability(&self, facility: FacilityId, date: NaiveDate) -> CanoebotResult<String> {
        let result = self.cache.get_result(date, facility).await?;
        Ok(format!(
            "{}\n\nBook at {}",
            result,
            self.cache.config().booking_link()
        ))
    }
}
