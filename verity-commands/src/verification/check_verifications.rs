use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;
use twilight_model::{
    application::{
        command::{Command, CommandType},
        interaction::application_command::{CommandData, CommandDataOption},
    },
    gateway::payload::incoming::InteractionCreate,
    guild::Permissions,
};
use twilight_util::builder::command::{BooleanBuilder, CommandBuilder, StringBuilder};

use crate::CommandMeta;
use verity_audit::{AuditReport, ScanOptions, run_audit};
use verity_core::{
    AuditError, Context, Settings,
    source::{ChannelLookup, ResponseSink},
};
use verity_utils::{
    history::GuildChannels,
    interaction::{InteractionResponder, bool_option, string_option},
    parse::{parse_boundary_date, parse_target_user_id},
};

pub const META: CommandMeta = CommandMeta {
    name: "check_verifications",
    desc: "Check for users with multiple messages containing date patterns",
    definition,
};

const DATE_EXPECTED: &str = "a date in MM-DD-YYYY format";
const USER_EXPECTED: &str = "a user ID or mention";
const GUILD_ONLY_MESSAGE: &str = "This command only works in servers.";
const SCAN_TIMED_OUT_MESSAGE: &str =
    "The scan took too long and was abandoned. Try a narrower date range.";

/// Slash command schema registered with Discord.
pub fn definition() -> anyhow::Result<Command> {
    let command = CommandBuilder::new(META.name, META.desc, CommandType::ChatInput)
        .default_member_permissions(Permissions::MANAGE_MESSAGES)
        .option(StringBuilder::new(
            "before",
            "Ignore messages posted after this date (MM-DD-YYYY)",
        ))
        .option(StringBuilder::new(
            "after",
            "Stop scanning at messages older than this date (MM-DD-YYYY)",
        ))
        .option(BooleanBuilder::new(
            "only_inconsistent",
            "Only list users whose dates disagree",
        ))
        .option(StringBuilder::new(
            "user_id",
            "Only check messages from this user (ID or mention)",
        ))
        .option(StringBuilder::new(
            "channel_name",
            "Name of the verification channel to scan",
        ))
        .validate()?
        .build();

    Ok(command)
}

/// Validated invocation options.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CheckVerificationsArgs {
    pub before: Option<DateTime<Utc>>,
    pub after: Option<DateTime<Utc>>,
    pub only_inconsistent: bool,
    pub user_id: Option<u64>,
    pub channel_name: String,
}

impl CheckVerificationsArgs {
    pub fn scan_options(&self, page_size: usize) -> ScanOptions {
        ScanOptions {
            before: self.before,
            after: self.after,
            author_id: self.user_id,
            page_size,
        }
    }
}

fn date_option(
    options: &[CommandDataOption],
    name: &'static str,
) -> Result<Option<DateTime<Utc>>, AuditError> {
    let Some(raw) = string_option(options, name) else {
        return Ok(None);
    };

    parse_boundary_date(raw)
        .map(Some)
        .ok_or_else(|| AuditError::InvalidArgument {
            option: name,
            value: raw.to_owned(),
            expected: DATE_EXPECTED,
        })
}

/// Read and validate the command options, falling back to `default_channel`.
pub fn parse_args(
    options: &[CommandDataOption],
    default_channel: &str,
) -> Result<CheckVerificationsArgs, AuditError> {
    let before = date_option(options, "before")?;
    let after = date_option(options, "after")?;

    let user_id = match string_option(options, "user_id") {
        Some(raw) => Some(
            parse_target_user_id(raw)
                .ok_or_else(|| AuditError::InvalidArgument {
                    option: "user_id",
                    value: raw.to_owned(),
                    expected: USER_EXPECTED,
                })?
                .get(),
        ),
        None => None,
    };

    let channel_name = string_option(options, "channel_name")
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(default_channel)
        .to_owned();

    Ok(CheckVerificationsArgs {
        before,
        after,
        only_inconsistent: bool_option(options, "only_inconsistent").unwrap_or(false),
        user_id,
        channel_name,
    })
}

pub fn channel_not_found_message(channel_name: &str) -> String {
    format!("Verification channel '{channel_name}' not found.")
}

fn invalid_argument_message(option: &str, value: &str, expected: &str) -> String {
    let value = value.replace('@', "@\u{200B}");
    format!("Invalid `{option}` value '{value}'. Expected {expected}.")
}

/// Handle a `/check_verifications` invocation from the gateway.
pub async fn run(
    ctx: Context,
    interaction: &InteractionCreate,
    data: &CommandData,
) -> anyhow::Result<()> {
    let responder = InteractionResponder::new(Arc::clone(&ctx.http), interaction);

    let Some(guild_id) = interaction.guild_id else {
        responder.defer().await?;
        responder.followup(GUILD_ONLY_MESSAGE).await?;
        return Ok(());
    };

    let channels = GuildChannels::new(Arc::clone(&ctx.http), guild_id);
    execute(&channels, &responder, &data.options, &ctx.settings).await
}

/// Defer, audit the requested channel and deliver the report as follow-ups.
///
/// Unreachable history propagates as an error; nothing partial is sent.
pub async fn execute<L, R>(
    channels: &L,
    sink: &R,
    options: &[CommandDataOption],
    settings: &Settings,
) -> anyhow::Result<()>
where
    L: ChannelLookup,
    R: ResponseSink,
{
    sink.defer().await?;

    let args = match parse_args(options, &settings.default_channel) {
        Ok(args) => args,
        Err(AuditError::InvalidArgument {
            option,
            value,
            expected,
        }) => {
            let notice = invalid_argument_message(option, &value, expected);
            sink.followup(&notice).await?;
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let Some(source) = channels
        .find_by_name(&args.channel_name)
        .await
        .map_err(AuditError::SourceUnavailable)?
    else {
        let err = AuditError::ChannelNotFound(args.channel_name.clone());
        warn!(%err, "verification audit skipped");
        sink.followup(&channel_not_found_message(&args.channel_name))
            .await?;
        return Ok(());
    };

    let scan_options = args.scan_options(settings.page_size);
    let audit = run_audit(
        &source,
        &scan_options,
        args.only_inconsistent,
        settings.chunk_length,
    );

    let report = match tokio::time::timeout(settings.scan_timeout, audit).await {
        Ok(report) => report?,
        Err(_) => {
            let err = AuditError::ScanTimedOut {
                secs: settings.scan_timeout.as_secs(),
            };
            warn!(%err, channel = %args.channel_name, "verification audit abandoned");
            sink.followup(SCAN_TIMED_OUT_MESSAGE).await?;
            return Ok(());
        }
    };

    match report {
        AuditReport::Chunks(chunks) => {
            // A single line longer than the chunk length arrives as its own
            // oversized chunk. Discord rejects it, so that follow-up fails
            // after the earlier chunks were already delivered.
            for chunk in &chunks {
                sink.followup(chunk).await?;
            }
        }
        AuditReport::Empty(notice) => sink.followup(notice).await?,
    }

    Ok(())
}
