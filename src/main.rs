use log::{error, info};

use wisecamp::guard::GuardDecision;
use wisecamp::navigation::Route;
use wisecamp::{App, AppError, Config};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    if let Err(e) = run() {
        error!("Failed to start: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let config = Config::from_env()?;
    info!("Using API at {}", config.api_base_url);
    info!("Session file: {}", config.session_file.display());

    let app = App::new(config)?;
    match app.start(Route::DEFAULT_AUTHENTICATED) {
        GuardDecision::Render => {
            let user = app.session().user();
            info!(
                "Signed in as {}; opened {}",
                user.map(|u| u.email).unwrap_or_default(),
                app.navigator().current()
            );
        }
        GuardDecision::RedirectToLogin => info!("No session; opened {}", app.navigator().current()),
        GuardDecision::Loading => info!("Session still loading"),
    }
    Ok(())
}
