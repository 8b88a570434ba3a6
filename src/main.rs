use activity_signup_client::app::terminal::print_screen;
use activity_signup_client::config::{Cli, Command};
use activity_signup_client::error::Result;
use activity_signup_client::interface::HttpClient;
use activity_signup_client::storage::FileTokenStore;
use activity_signup_client::{logging, App, NativeClient};
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let client = NativeClient::connect(&cli.base_url).await?;
    let app = App::new(client, FileTokenStore::new(&cli.token_file));

    app.start().await;

    let succeeded = match cli.command.unwrap_or(Command::List) {
        Command::List | Command::Whoami => true,
        Command::Login { username, password } => {
            app.open_login();
            app.submit_login(&username, &password).await
        }
        Command::Logout => {
            app.logout().await;
            true
        }
        Command::Signup { activity, email } => app.signup(&activity, &email).await,
        Command::Unregister { activity, email } => app.unregister(&activity, &email).await,
    };

    print_screen(&app.screen());

    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}
