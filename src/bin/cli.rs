use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;

use todoapp::cli::{NewAdmin, create_admin};
use todoapp_config::DatabaseConfig;
use todoapp_db::{init_db_pool, run_migrations};

#[derive(Parser)]
#[command(name = "todoapp-cli")]
#[command(about = "Todo App CLI - Administrative tools for the Todo API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an administrator account
    CreateAdmin {
        /// Login name
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// First name
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        /// Last name
        #[arg(short = 'l', long)]
        last_name: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Apply pending database migrations
    Migrate,
}

fn prompt(value: Option<String>, label: &str) -> anyhow::Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Ok(Input::new().with_prompt(label).interact_text()?),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();
    let config = DatabaseConfig::from_env()?;
    let pool = init_db_pool(&config).await?;

    match cli.command {
        Commands::CreateAdmin {
            username,
            email,
            first_name,
            last_name,
            password,
        } => {
            let username = prompt(username, "Username")?;
            let email = prompt(email, "Email address")?;
            let first_name = prompt(first_name, "First name")?;
            let last_name = prompt(last_name, "Last name")?;
            let password = match password {
                Some(password) => password,
                None => Password::new()
                    .with_prompt("Password")
                    .with_confirmation("Confirm password", "Passwords don't match")
                    .interact()?,
            };

            let id = create_admin(
                &pool,
                NewAdmin {
                    username: &username,
                    email: &email,
                    first_name: &first_name,
                    last_name: &last_name,
                    password: &password,
                },
            )
            .await?;

            println!("\n✅ Admin created successfully!");
            println!("   Id: {id}");
            println!("   Username: {username}");
            println!("   Name: {first_name} {last_name}");
        }
        Commands::Migrate => {
            run_migrations(&pool).await?;
            println!("✅ Migrations applied");
        }
    }

    Ok(())
}
