use crate::common::error::ServiceResult;
use crate::settings::AppSettings;
use discord_webhook2::message::Message;
use discord_webhook2::webhook::DiscordWebhook;
use iso8061_timestamp::Timestamp;

const WARN_COLOR: u32 = 0xff8c00;

pub async fn warn(title: &str, description: &str) -> ServiceResult<()> {
    send(title, description, WARN_COLOR).await
}

pub async fn send(title: &str, description: &str, color: u32) -> ServiceResult<()> {
    let settings = AppSettings::get();
    let Some(webhook_url) = settings.discord_webhook_url.as_deref() else {
        tracing::warn!(title, description, "Discord Webhook url not set");
        return Ok(());
    };

    let webhook = DiscordWebhook::new(webhook_url)?;
    webhook
        .send(&Message::new(|message| {
            message.embed(|embed| {
                embed
                    .description(description)
                    .author(|author| author.name(title))
                    .color(color)
                    .footer(|footer| footer.text("support-chat-service"))
                    .timestamp(Timestamp::now_utc())
            })
        }))
        .await?;

    Ok(())
}
