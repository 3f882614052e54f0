//! Discord event handler
//!
//! Routes gateway events to the XP engine, the track-selection flow, and
//! the verification button. Failures on primary paths are logged and never
//! crash the event loop; notification side channels (announcements, DMs)
//! are best-effort by design.

use anyhow::{Context as _, Result};
use serenity::all::{
    ComponentInteraction, Context, CreateInteractionResponse, CreateInteractionResponseMessage,
    CreateMessage, EditRole, EventHandler, GuildId, Interaction, Mentionable, Message, Reaction,
    ReactionType, Ready, User,
};
use serenity::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::commands;
use crate::config::{BotConfig, XP_PER_MESSAGE};
use crate::progression::{self, Track};
use crate::roles::RoleCache;
use crate::store::UserStore;

/// `custom_id` of the persistent verification button. Interactions are
/// routed by this id, so buttons on messages posted before a restart stay
/// clickable without re-registration.
pub const VERIFY_BUTTON_ID: &str = "verify_button";

/// Role granted by the verification flow. Must pre-exist in the guild.
pub const VERIFIED_ROLE: &str = "Adventurer";

pub struct Handler {
    pub(crate) config: BotConfig,
    /// The store lock is held across each read-modify-write-save sequence,
    /// so two rapid messages from one user cannot lose an update.
    pub(crate) store: Mutex<UserStore>,
    pub(crate) roles: RoleCache,
}

impl Handler {
    pub fn new(config: BotConfig, store: UserStore) -> Self {
        Self {
            config,
            store: Mutex::new(store),
            roles: RoleCache::new(),
        }
    }

    /// Apply a level-up: find the member's track from held roles, grant the
    /// ladder role for the new level (creating it if the guild lacks it),
    /// revoke superseded ranks, and celebrate.
    async fn promote(
        &self,
        ctx: &Context,
        guild_id: GuildId,
        user: &User,
        level: u64,
    ) -> Result<()> {
        let member = guild_id
            .member(&ctx.http, user.id)
            .await
            .context("failed to fetch the member for promotion")?;

        let held = self.roles.names_of(&ctx.http, guild_id, &member.roles).await?;
        let Some(plan) = progression::promotion(&held, level) else {
            // No track selected yet, or the ladder is capped.
            return Ok(());
        };

        let role_id = match self.roles.resolve(&ctx.http, guild_id, plan.grant).await? {
            Some(id) => id,
            None => {
                let role = guild_id
                    .create_role(&ctx.http, EditRole::new().name(plan.grant))
                    .await
                    .context("failed to create the ladder role")?;
                info!(role = plan.grant, "created ladder role");
                self.roles.insert(guild_id, plan.grant, role.id).await;
                role.id
            }
        };

        // Grant before revoking: the member may briefly hold two ladder
        // roles, never zero.
        member
            .add_role(&ctx.http, role_id)
            .await
            .context("failed to grant the ladder role")?;

        for name in &plan.revoke {
            if let Some(id) = self.roles.resolve(&ctx.http, guild_id, name).await? {
                member
                    .remove_role(&ctx.http, id)
                    .await
                    .context("failed to revoke a superseded ladder role")?;
            }
        }

        info!(
            user = %user.name,
            track = %plan.track,
            role = plan.grant,
            level,
            "member promoted"
        );

        let text = plan
            .track
            .levelup_message(&user.mention().to_string(), plan.grant, level);

        if let Err(e) = self.config.announce_channel.say(&ctx.http, text.as_str()).await {
            warn!(error = %e, "level-up announcement failed");
        }
        if let Err(e) = user
            .dm(&ctx.http, CreateMessage::new().content(text.as_str()))
            .await
        {
            debug!(error = %e, user = %user.name, "level-up DM suppressed");
        }

        Ok(())
    }

    /// Apply a track-selection reaction: strip every ladder role the member
    /// holds (any track), then grant the chosen base role. Last reaction
    /// wins.
    async fn assign_track(&self, ctx: &Context, reaction: Reaction) -> Result<()> {
        let Some(guild_id) = reaction.guild_id else {
            return Ok(());
        };
        let Some(member) = reaction.member else {
            return Ok(());
        };
        if member.user.bot {
            return Ok(());
        }

        let ReactionType::Unicode(emoji) = &reaction.emoji else {
            return Ok(());
        };
        let Some(track) = Track::from_emoji(emoji) else {
            return Ok(());
        };

        // Base track roles are pre-created by hand; selection never
        // creates them.
        let Some(target) = self
            .roles
            .resolve(&ctx.http, guild_id, track.base_role())
            .await?
        else {
            debug!(track = %track, "base track role missing, selection skipped");
            return Ok(());
        };

        let held = self.roles.names_of(&ctx.http, guild_id, &member.roles).await?;
        let plan = progression::selection(track, &held);

        for name in &plan.strip {
            if let Some(id) = self.roles.resolve(&ctx.http, guild_id, name).await? {
                member
                    .remove_role(&ctx.http, id)
                    .await
                    .context("failed to strip a ladder role")?;
            }
        }

        member
            .add_role(&ctx.http, target)
            .await
            .context("failed to grant the track role")?;

        info!(user = %member.user.name, track = %track, "track selected");

        let text = format!(
            "✅ Kamu telah memilih peran: **{role}**\n*You have chosen the role: **{role}***",
            role = plan.grant
        );
        if let Err(e) = member
            .user
            .dm(&ctx.http, CreateMessage::new().content(text))
            .await
        {
            debug!(error = %e, user = %member.user.name, "selection DM suppressed");
        }

        Ok(())
    }

    /// Grant the verified role to whoever pressed the button and confirm
    /// with an ephemeral reply. A guild without the role is a no-op.
    async fn verify_member(&self, ctx: &Context, component: &ComponentInteraction) -> Result<()> {
        let Some(guild_id) = component.guild_id else {
            return Ok(());
        };
        let Some(role_id) = self
            .roles
            .resolve(&ctx.http, guild_id, VERIFIED_ROLE)
            .await?
        else {
            debug!(role = VERIFIED_ROLE, "verified role missing, button ignored");
            return Ok(());
        };

        ctx.http
            .add_member_role(guild_id, component.user.id, role_id, Some("verified"))
            .await
            .context("failed to grant the verified role")?;

        component
            .create_response(
                &ctx.http,
                CreateInteractionResponse::Message(
                    CreateInteractionResponseMessage::new()
                        .content("✅ Kamu telah diverifikasi!\n*You have been verified!*")
                        .ephemeral(true),
                ),
            )
            .await
            .context("failed to acknowledge verification")?;

        info!(user = %component.user.name, "member verified");
        Ok(())
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(user = %ready.user.name, "gateway session ready");
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        // Commands earn XP like any other chatter.
        let outcome = {
            let mut store = self.store.lock().await;
            let outcome = store.award_xp(&msg.author.id.to_string(), XP_PER_MESSAGE);
            if let Err(e) = store.save().await {
                error!(error = %e, "failed to persist user data");
            }
            outcome
        };

        if outcome.leveled_up {
            if let Some(guild_id) = msg.guild_id {
                if let Err(e) = self
                    .promote(&ctx, guild_id, &msg.author, outcome.record.level)
                    .await
                {
                    error!(error = %e, user = %msg.author.name, "promotion failed");
                }
            }
        }

        if msg.content.starts_with(commands::PREFIX) {
            if let Err(e) = commands::dispatch(self, &ctx, &msg).await {
                error!(error = %e, content = %msg.content, "command failed");
            }
        }
    }

    async fn reaction_add(&self, ctx: Context, reaction: Reaction) {
        if let Err(e) = self.assign_track(&ctx, reaction).await {
            error!(error = %e, "track selection failed");
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Component(component) = interaction else {
            return;
        };
        if component.data.custom_id != VERIFY_BUTTON_ID {
            return;
        }
        if let Err(e) = self.verify_member(&ctx, &component).await {
            error!(error = %e, user = %component.user.name, "verification failed");
        }
    }
}
