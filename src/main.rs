use support_chat_service::api;
use support_chat_service::common::init;
use support_chat_service::settings::AppSettings;
use support_chat_service::workers::crons;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = AppSettings::get();
    init::initialize_logging(settings);
    match settings.app_component.as_str() {
        "api" => api::serve(settings).await,
        "cleanup-cron" => crons::cleanup_cron::serve(settings).await,
        other => anyhow::bail!("Unknown app component: {other}"),
    }
}
