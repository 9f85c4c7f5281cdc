//! Profile scan service
//!
//! Flags members whose name or profile text contains keywords typical of
//! scam and spam accounts. The scan is advisory: nobody is jailed, a report
//! is posted for moderators to review.

use std::collections::BTreeSet;

use futures::stream::{self, StreamExt};
use jail_core::{
    truncate_content, GuildMember, MessageAttachment, OutgoingMessage, Snowflake, MAX_MESSAGE_LENGTH,
};
use tracing::{debug, info, instrument, warn};

use crate::dto::{ActorRequest, ProfileScanReport, ReportDelivery, SuspiciousProfile};

use super::audit_log::AuditLog;
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::permission::PermissionService;

/// Name of the attached report file
pub const REPORT_FILE_NAME: &str = "suspicious_profiles_report.txt";

/// Matched against the username and nickname
pub const USERNAME_KEYWORDS: &[&str] = &[
    "CRYPTO", "ECOM", "SHOPIFY", "NFT", "INVEST", "TRADING", "PAYMENT", "BITCOIN", "FREE", "BTC", "SCAM",
    "HACK", "SPAM",
];

/// Matched against the bio and pronouns
pub const BIO_KEYWORDS: &[&str] = &[
    "FREELANCE",
    "WORK FROM HOME",
    "EARN MONEY",
    "MAKE MONEY",
    "GET RICH",
    "QUICK CASH",
    "ONLINE JOB",
    "ONLINE BUSINESS",
    "ONLINE EARNING",
    "ONLINE INCOME",
    "ONLINE INVESTMENT",
    "DM",
    "CRYPTO",
    "NFT",
    "INVEST",
    "TRADING",
    "BITCOIN",
    "BTC",
    "PROFESSIONAL",
    "FREELANCER",
    "FREELANCING",
    "EXPERT",
    "DISCORD",
    "SERVER",
    "DROPSHIPPING",
    "E-COMMERCE",
    "E-COM",
    "SHOPIFY",
    "ECOMMERCE",
    "SEO",
    "MARKETING",
    "BUSINESS",
];

/// Profile fetches in flight at once
const PROFILE_CONCURRENCY: usize = 10;

/// Lowercased username and nickname
pub fn username_text(member: &GuildMember) -> String {
    format!("{} {}", member.username, member.nickname.as_deref().unwrap_or_default()).to_lowercase()
}

/// Keywords found in either text, deduplicated
///
/// Both texts must already be lowercased.
pub fn match_keywords(username_text: &str, bio_text: &str) -> BTreeSet<&'static str> {
    let hits = |keywords: &'static [&'static str], text: &str| {
        keywords
            .iter()
            .copied()
            .filter(|k| text.contains(&k.to_lowercase()))
            .collect::<Vec<_>>()
    };
    let mut found: BTreeSet<&'static str> = hits(USERNAME_KEYWORDS, username_text).into_iter().collect();
    found.extend(hits(BIO_KEYWORDS, bio_text));
    found
}

/// Profile scan service
pub struct ProfileScanService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ProfileScanService<'a> {
    /// Create a new ProfileScanService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Scan every member that is not jailed and post the findings
    #[instrument(skip(self, request), fields(actor_id = %request.actor_id))]
    pub async fn scan(&self, guild_id: Snowflake, request: ActorRequest) -> ServiceResult<ProfileScanReport> {
        PermissionService::new(self.ctx)
            .authorize(guild_id, request.actor_id)
            .await?;

        let jail_roles = self.ctx.jail_config().jail_roles();
        let members: Vec<GuildMember> = self
            .ctx
            .client()
            .list_members(guild_id)
            .await?
            .into_iter()
            .filter(|m| !m.has_any_role(&jail_roles))
            .collect();

        let mut report = ProfileScanReport::new(guild_id);
        report.members_scanned = members.len();

        let mut flagged: Vec<SuspiciousProfile> = stream::iter(members)
            .map(|member| async move { self.inspect(member).await })
            .buffer_unordered(PROFILE_CONCURRENCY)
            .filter_map(|hit| async move { hit })
            .collect()
            .await;
        flagged.sort_by_key(|p| p.user_id);
        report.flagged = flagged;

        if !report.flagged.is_empty() {
            self.deliver(guild_id, request.channel_id, &mut report).await;
        }

        info!(
            guild_id = %guild_id,
            members_scanned = report.members_scanned,
            flagged = report.flagged.len(),
            delivery = ?report.delivery,
            "Profile scan complete"
        );
        Ok(report)
    }

    async fn inspect(&self, member: GuildMember) -> Option<SuspiciousProfile> {
        let bio_text = match self.ctx.client().fetch_profile(member.user_id).await {
            Ok(Some(profile)) => profile.searchable_text(),
            Ok(None) => String::new(),
            Err(e) => {
                debug!(member_id = %member.user_id, error = %e, "Profile unavailable, scanning name only");
                String::new()
            }
        };

        let keywords = match_keywords(&username_text(&member), &bio_text);
        if keywords.is_empty() {
            return None;
        }
        Some(SuspiciousProfile {
            user_id: member.user_id,
            username: member.username,
            keywords: keywords.into_iter().map(str::to_string).collect(),
        })
    }

    /// Post the report file, falling back to truncated inline text
    async fn deliver(&self, guild_id: Snowflake, invoking_channel: Option<Snowflake>, report: &mut ProfileScanReport) {
        let audit = AuditLog::new(self.ctx);
        let target = match audit.log_channel(guild_id).await {
            Some(channel) => channel.id,
            None => match invoking_channel {
                Some(channel_id) => channel_id,
                None => {
                    warn!(guild_id = %guild_id, "No channel to deliver the scan report to");
                    report.delivery = ReportDelivery::Failed;
                    return;
                }
            },
        };

        let text = report.report_text();
        let with_file = OutgoingMessage::text(report.reply())
            .with_attachment(MessageAttachment::new(REPORT_FILE_NAME, text.as_bytes().to_vec()));

        report.delivered_to = Some(target);
        report.delivery = match audit.send_with_retry(target, &with_file).await {
            Ok(_) => ReportDelivery::Attachment,
            Err(e) => {
                warn!(channel_id = %target, error = %e, "Report upload failed, sending inline");
                let inline = OutgoingMessage::text(truncate_content(&text, MAX_MESSAGE_LENGTH));
                match audit.send_with_retry(target, &inline).await {
                    Ok(_) => ReportDelivery::Inline,
                    Err(e) => {
                        warn!(channel_id = %target, error = %e, "Inline report failed");
                        report.delivered_to = None;
                        ReportDelivery::Failed
                    }
                }
            }
        };
    }
}
