//! Text command surface
//!
//! Prefix commands parsed straight from message content: `!verify`,
//! `!roles`, `!rank`, `!xp`. Unknown prefixed text is treated as plain
//! chatter, not an error.

use anyhow::{Context as _, Result};
use serenity::all::{
    ButtonStyle, Colour, Context, CreateActionRow, CreateButton, CreateEmbed, CreateEmbedFooter,
    CreateMessage, Message, ReactionType, UserId,
};
use tracing::warn;

use crate::handler::{Handler, VERIFY_BUTTON_ID};
use crate::progression::Track;

/// Command prefix.
pub const PREFIX: char = '!';

/// Dispatch a prefixed message to its command handler.
pub async fn dispatch(handler: &Handler, ctx: &Context, msg: &Message) -> Result<()> {
    let name = msg
        .content
        .trim_start_matches(PREFIX)
        .split_whitespace()
        .next()
        .unwrap_or("");

    match name {
        "verify" => verify(ctx, msg).await,
        "roles" => roles(ctx, msg).await,
        "rank" => rank(handler, ctx, msg).await,
        "xp" => xp(handler, ctx, msg).await,
        _ => Ok(()),
    }
}

/// `!verify` — post the verification embed with its persistent button.
async fn verify(ctx: &Context, msg: &Message) -> Result<()> {
    let embed = CreateEmbed::new()
        .title("📜 Verify Yourself")
        .description(
            "Klik tombol di bawah untuk mendapatkan akses penuh ke server.\n\n\
             *Click the button below to verify yourself.*",
        )
        .colour(Colour::DARK_GREEN);

    let button = CreateButton::new(VERIFY_BUTTON_ID)
        .label("✅ Verify | *Verifikasi*")
        .style(ButtonStyle::Success);

    msg.channel_id
        .send_message(
            &ctx.http,
            CreateMessage::new()
                .embed(embed)
                .components(vec![CreateActionRow::Buttons(vec![button])]),
        )
        .await
        .context("failed to post the verification message")?;

    Ok(())
}

/// `!roles` — post the track-selection embed and pre-seed the five
/// reaction emoji on it.
async fn roles(ctx: &Context, msg: &Message) -> Result<()> {
    let embed = CreateEmbed::new()
        .title("🎭 Choose Your Path")
        .description(
            "Pilih peran malam yang paling mencerminkan dirimu.\n\
             *Choose the night identity that best reflects your soul.*\n\n\
             Kamu hanya bisa memilih satu. Jika kamu memilih lebih dari satu, peran sebelumnya akan digantikan.\n\
             *One choice. One path. If you select more than one, the previous role will be replaced.*\n\n\
             💀 **Phantom**\n\
             Hening, misterius, dan berjalan di antara bayangan.\n\
             *Silent and unseen, they drift through shadows.*\n\n\
             🧛 **Whisperer**\n\
             Pembisik malam, membawa kisah dan rahasia tersembunyi.\n\
             *Bearers of secrets and stories, they speak when the night listens.*\n\n\
             🦉 **Lurker**\n\
             Pengamat dalam diam, selalu hadir meski tak bersuara.\n\
             *Watchful and calm, their eyes pierce through silence.*\n\n\
             🦇 **Dreamwalker**\n\
             Penjelajah dimensi mimpi, hidup antara ilusi dan realita.\n\
             *Wanderers of dreamscapes, floating between illusion and truth.*\n\n\
             🪽 **Angel**\n\
             Cahaya lembut di tengah gelapnya malam, pelindung dan penyembuh.\n\
             *Gentle lights in the dark. They protect and quietly heal.*\n\n\
             *React with the emoji below to claim your role. The night awaits.*",
        )
        .colour(Colour::DARK_PURPLE)
        .footer(CreateEmbedFooter::new(
            "⚠️ You can only have ONE main role. You cannot choose another role, \
             when you have chosen a role, please choose wisely.",
        ));

    let posted = msg
        .channel_id
        .send_message(&ctx.http, CreateMessage::new().embed(embed))
        .await
        .context("failed to post the role-selection message")?;

    for track in Track::ALL {
        posted
            .react(&ctx.http, ReactionType::Unicode(track.emoji().to_string()))
            .await
            .context("failed to seed a selection reaction")?;
    }

    Ok(())
}

/// `!rank` — top-10 leaderboard, posted in place and mirrored to the
/// announcement channel.
async fn rank(handler: &Handler, ctx: &Context, msg: &Message) -> Result<()> {
    let top = handler.store.lock().await.top(10);

    let mut embed = CreateEmbed::new()
        .title("🏆 Top 10 Leaderboard")
        .colour(Colour::PURPLE)
        .footer(CreateEmbedFooter::new("Keep chatting to climb the ranks! 💬"));

    for (index, (user_id, record)) in top.iter().enumerate() {
        // Fall back to the raw id when the account is gone.
        let name = match user_id.parse::<u64>().ok().filter(|raw| *raw != 0) {
            Some(raw) => UserId::new(raw)
                .to_user(&ctx.http)
                .await
                .map(|user| user.name)
                .unwrap_or_else(|_| user_id.clone()),
            None => user_id.clone(),
        };

        embed = embed.field(
            format!("#{} - {}", index + 1, name),
            format!("Level: {} | XP: {}", record.level, record.xp),
            false,
        );
    }

    msg.channel_id
        .send_message(&ctx.http, CreateMessage::new().embed(embed.clone()))
        .await
        .context("failed to post the leaderboard")?;

    if let Err(e) = handler
        .config
        .announce_channel
        .send_message(&ctx.http, CreateMessage::new().embed(embed))
        .await
    {
        warn!(error = %e, "leaderboard mirror failed");
    }

    Ok(())
}

/// `!xp` — the invoking user's own XP and level. Reads only; a never-seen
/// user reports zeros without being inserted into the store.
async fn xp(handler: &Handler, ctx: &Context, msg: &Message) -> Result<()> {
    let record = handler.store.lock().await.get(&msg.author.id.to_string());

    let embed = CreateEmbed::new()
        .title(format!("📊 XP & Level for {}", msg.author.name))
        .description(format!("Level: {}\nXP: {}", record.level, record.xp))
        .colour(Colour::ORANGE);

    msg.channel_id
        .send_message(&ctx.http, CreateMessage::new().embed(embed))
        .await
        .context("failed to post the XP summary")?;

    Ok(())
}
