use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;
use dialoguer::Password;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ChatApi;
use crate::domain::models::ChatApiBox;
use crate::domain::models::ChatMode;
use crate::domain::models::ClientError;
use crate::domain::models::Conversation;
use crate::domain::models::ThemeName;
use crate::domain::services::ConversationList;
use crate::domain::services::SessionManager;
use crate::infrastructure::api::HttpApi;
use crate::infrastructure::storage::FileSessionStore;

pub fn help_text() -> String {
    let text = r#"
HOTKEYS:
- Enter - Send the message, or select the conversation under the sidebar cursor
- Tab - Move focus between the sidebar and the message input
- Up/Down arrows - Scroll the thread, or move the sidebar cursor
- CTRL+N - Start a new conversation
- CTRL+B - Show or hide the conversation sidebar
- CTRL+R - Resend the last message that failed to deliver
- CTRL+L - Log out, or open the login form when logged out
- CTRL+U / CTRL+D - Page up / page down
- CTRL+C - Exit JaviAI

SIDEBAR:
- r - Rename the conversation under the cursor
- d - Delete the conversation under the cursor, then y to confirm or n to cancel

LOGIN:
- Tab, Up/Down arrows - Move between fields
- CTRL+R - Open the registration form
- Esc - Back to the chat
        "#;

    return text.trim().to_string();
}

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    std::process::exit(0);
}

fn format_conversation(conversation: &Conversation) -> String {
    return format!("- (ID: {}) {}", conversation.id, conversation.title);
}

fn session_manager() -> SessionManager {
    return SessionManager::new(Box::<FileSessionStore>::default());
}

fn api() -> ChatApiBox {
    return Box::<HttpApi>::default();
}

async fn require_token(session: &mut SessionManager) -> Result<String> {
    match session.restore().await {
        Some(current) => return Ok(current.token.to_string()),
        None => {
            bail!(ClientError::Unauthenticated);
        }
    }
}

fn required_string(matches: &ArgMatches, id: &str) -> Result<String> {
    match matches.get_one::<String>(id) {
        Some(val) => return Ok(val.to_string()),
        None => bail!(format!("Missing required argument '{id}'")),
    }
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

async fn login(matches: &ArgMatches) -> Result<()> {
    let username = required_string(matches, "username")?;
    let password = match matches.get_one::<String>("password") {
        Some(password) => password.to_string(),
        None => Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Password")
            .interact()?,
    };

    let mut session = session_manager();
    let current = session.login(&api(), &username, &password).await?;
    println!(
        "{}",
        Paint::green(format!("Logged in as {}", current.username))
    );

    return Ok(());
}

async fn register(matches: &ArgMatches) -> Result<()> {
    let username = required_string(matches, "username")?;
    let email = matches
        .get_one::<String>("email")
        .map(|e| return e.to_string())
        .unwrap_or_default();
    let password = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("Password")
        .with_confirmation("Repeat password", "The passwords don't match")
        .interact()?;

    session_manager()
        .register(&api(), &username, &email, &password)
        .await?;
    println!(
        "{}",
        Paint::green("User registered successfully. You can now log in.")
    );

    return Ok(());
}

async fn logout() -> Result<()> {
    let mut session = session_manager();
    session.restore().await;
    session.logout().await?;
    println!("Logged out");

    return Ok(());
}

async fn conversations(matches: &ArgMatches) -> Result<()> {
    let mut session = session_manager();
    let token = require_token(&mut session).await?;
    let api = api();

    match matches.subcommand() {
        Some(("list", _)) => {
            let mut list = ConversationList::default();
            list.list(&api, &token).await?;

            if list.items().is_empty() {
                println!("There are no conversations yet. Start one with `javiai conversations create`.");
            } else {
                let res = list
                    .items()
                    .iter()
                    .map(format_conversation)
                    .collect::<Vec<String>>();
                println!("{}", res.join("\n"));
            }
        }
        Some(("create", _)) => {
            let conversation = api.create_conversation(&token).await?;
            println!("Created {}", format_conversation(&conversation));
        }
        Some(("rename", rename_matches)) => {
            let id = required_string(rename_matches, "id")?;
            let title = required_string(rename_matches, "title")?;
            if title.trim().is_empty() {
                bail!("The title can't be empty");
            }

            let conversation = api.rename_conversation(&token, &id, title.trim()).await?;
            println!("Renamed {}", format_conversation(&conversation));
        }
        Some(("delete", delete_matches)) => {
            let id = required_string(delete_matches, "id")?;
            let confirmed = delete_matches.get_flag("yes")
                || Confirm::with_theme(&ColorfulTheme::default())
                    .with_prompt(format!("Delete conversation {id}?"))
                    .default(false)
                    .interact()?;

            if !confirmed {
                println!("Nothing was deleted");
                return Ok(());
            }

            api.delete_conversation(&token, &id).await?;
            println!("Deleted conversation {id}");
        }
        Some(("history", history_matches)) => {
            let id = history_matches.get_one::<String>("id");
            let messages = api.history(&token, id.map(|e| return e.as_str())).await?;
            let username = session.current().map(|e| return e.username.to_string());

            for message in messages {
                println!(
                    "{}\n{}\n",
                    Paint::new(message.role.label(username.as_deref())).bold(),
                    message.content
                );
            }
        }
        _ => {
            subcommand_conversations().print_long_help()?;
        }
    }

    return Ok(());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_debug() -> Command {
    return Command::new("debug")
        .about("Debug helpers for JaviAI")
        .hide(true)
        .subcommand(
            Command::new("log-path").about("Output path to debug log file generated when running JaviAI with environment variable RUST_LOG=javiai")
        )
        .subcommand(
            Command::new("enum-config").about("List all config keys as strings.")
        )
        .subcommand(
            Command::new("session-path").about("Output path to the file holding the stored session.")
        );
}

fn arg_username() -> Arg {
    return Arg::new("username")
        .short('u')
        .long("username")
        .help("Account username.")
        .num_args(1)
        .required(true);
}

fn subcommand_login() -> Command {
    return Command::new("login")
        .about("Log in and store the session for the next chat.")
        .arg(arg_username())
        .arg(
            Arg::new("password")
                .short('p')
                .long("password")
                .env("JAVIAI_PASSWORD")
                .hide_env_values(true)
                .num_args(1)
                .help("Account password. Prompted for when omitted."),
        );
}

fn subcommand_register() -> Command {
    return Command::new("register")
        .about("Create a new account. The password is prompted for.")
        .arg(arg_username())
        .arg(
            Arg::new("email")
                .short('e')
                .long("email")
                .num_args(1)
                .help("Account email address."),
        );
}

fn arg_conversation_id() -> Arg {
    return Arg::new("id")
        .short('i')
        .long("id")
        .help("Conversation ID")
        .num_args(1)
        .required(true);
}

fn subcommand_conversations() -> Command {
    return Command::new("conversations")
        .about("Manage conversations of the logged in account.")
        .arg_required_else_help(true)
        .subcommand(Command::new("list").about("List all conversations with their ids and titles."))
        .subcommand(Command::new("create").about("Start a new, empty conversation."))
        .subcommand(
            Command::new("rename")
                .about("Change the title of a conversation.")
                .arg(arg_conversation_id())
                .arg(
                    Arg::new("title")
                        .long("title")
                        .help("New title")
                        .num_args(1)
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a conversation and its messages.")
                .arg(arg_conversation_id())
                .arg(
                    Arg::new("yes")
                        .short('y')
                        .long("yes")
                        .help("Skip the confirmation prompt.")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("history")
                .about("Print the messages of a conversation. Without an ID the legacy single thread is printed.")
                .arg(arg_conversation_id().required(false)),
        );
}

pub fn build() -> Command {
    let commands_text = help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.ends_with(':') {
                return Paint::new(format!("CHAT {line}"))
                    .underline()
                    .bold()
                    .to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}\nCommit: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    );

    return Command::new("javiai")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(Command::new("chat").about("Open the chat. This is the default command."))
        .subcommand(subcommand_login())
        .subcommand(subcommand_register())
        .subcommand(Command::new("logout").about("Forget the stored session."))
        .subcommand(subcommand_conversations())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .arg(
            Arg::new(ConfigKey::ApiUrl.to_string())
                .short('a')
                .long(ConfigKey::ApiUrl.to_string())
                .env("JAVIAI_API_URL")
                .num_args(1)
                .help(format!("Base URL of the JaviAI backend. [default: {}]", Config::default(ConfigKey::ApiUrl)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::ChatMode.to_string())
                .short('m')
                .long(ConfigKey::ChatMode.to_string())
                .env("JAVIAI_CHAT_MODE")
                .num_args(1)
                .help(format!("Whether to chat in separate conversations or in the legacy single thread. [default: {}]", Config::default(ConfigKey::ChatMode)))
                .value_parser(PossibleValuesParser::new(ChatMode::VARIANTS))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("JAVIAI_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::RequestTimeout.to_string())
                .long(ConfigKey::RequestTimeout.to_string())
                .env("JAVIAI_REQUEST_TIMEOUT")
                .num_args(1)
                .help(format!("Time to wait in milliseconds for a backend response. 0 waits forever. [default: {}]", Config::default(ConfigKey::RequestTimeout)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::SessionFile.to_string())
                .long(ConfigKey::SessionFile.to_string())
                .env("JAVIAI_SESSION_FILE")
                .num_args(1)
                .help(format!("Path to the file holding the stored session. [default: {}]", Config::default(ConfigKey::SessionFile)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::Sidebar.to_string())
                .long(ConfigKey::Sidebar.to_string())
                .env("JAVIAI_SIDEBAR")
                .num_args(1)
                .help(format!("Whether the conversation sidebar starts visible. [default: {}]", Config::default(ConfigKey::Sidebar)))
                .value_parser(PossibleValuesParser::new(["visible", "hidden"]))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::SidebarWidth.to_string())
                .long(ConfigKey::SidebarWidth.to_string())
                .env("JAVIAI_SIDEBAR_WIDTH")
                .num_args(1)
                .help(format!("Width of the conversation sidebar in columns. [default: {}]", Config::default(ConfigKey::SidebarWidth)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::Theme.to_string())
                .short('t')
                .long(ConfigKey::Theme.to_string())
                .env("JAVIAI_THEME")
                .num_args(1)
                .help(format!("Colour theme of the chat. [default: {}]", Config::default(ConfigKey::Theme)))
                .value_parser(PossibleValuesParser::new(ThemeName::VARIANTS))
                .global(true),
        );
}

pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("debug", debug_matches)) => {
            match debug_matches.subcommand() {
                Some(("log-path", _)) => {
                    let log_path = Config::log_dir().join("debug.log");
                    println!("{}", log_path.to_string_lossy());
                }
                Some(("enum-config", _)) => {
                    let res = ConfigKey::VARIANTS.join("\n");
                    println!("{}", res);
                }
                Some(("session-path", session_matches)) => {
                    Config::load(build(), vec![&matches, debug_matches, session_matches]).await?;
                    println!("{}", Config::get(ConfigKey::SessionFile));
                }
                _ => {
                    subcommand_debug().print_long_help()?;
                }
            }

            return Ok(false);
        }
        Some(("chat", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
        }
        Some(("login", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            login(subcmd_matches).await?;
            return Ok(false);
        }
        Some(("register", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            register(subcmd_matches).await?;
            return Ok(false);
        }
        Some(("logout", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            logout().await?;
            return Ok(false);
        }
        Some(("conversations", subcmd_matches)) => {
            let mut all_matches = vec![&matches, subcmd_matches];
            if let Some((_, action_matches)) = subcmd_matches.subcommand() {
                all_matches.push(action_matches);
            }

            Config::load(build(), all_matches).await?;
            conversations(subcmd_matches).await?;
            return Ok(false);
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(false);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(false);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(false);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(false);
            }
        },
        _ => {
            Config::load(build(), vec![&matches]).await?;
        }
    }

    return Ok(true);
}
