use std::path::PathBuf;
use std::sync::Arc;

use assignment_portal::api::config::{ApiConfig, ConfigError};
use assignment_portal::api::{ApiClient, ApiError};
use assignment_portal::auth::AuthState;
use assignment_portal::record::{FormError, UserField};
use assignment_portal::routes::Route;
use assignment_portal::storage::{FileStore, StorageError};
use assignment_portal::views::{LoginView, Page, UserDetailView, UsersView};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error("not logged in; run `assignment-portal login` first")]
    NotLoggedIn,
    #[error("{0}")]
    View(String),
}

#[derive(Parser, Debug)]
#[command(name = "assignment-portal", about = "Assignment users REST client")]
struct Cli {
    #[arg(long, env = "ASSIGNMENT_API_BASE")]
    base_url: Option<String>,

    #[arg(long, env = "ASSIGNMENT_STATE_DIR", help = "Directory holding the persisted session")]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long, env = "ASSIGNMENT_USERNAME")]
        username: String,
        #[arg(long, env = "ASSIGNMENT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    Status,
    Users(UsersCommand),
    /// Resolve a client route (`/login`, `/users`, `/users/{name}`) and render it.
    Open {
        path: String,
    },
}

#[derive(Args, Debug)]
struct UsersCommand {
    #[command(subcommand)]
    command: UsersSubcommand,
}

#[derive(Subcommand, Debug)]
enum UsersSubcommand {
    List,
    Show { name: String },
    Update(UpdateArgs),
}

#[derive(Args, Debug)]
struct UpdateArgs {
    name: String,

    #[arg(long = "name1", help = "New display name")]
    display_name: Option<String>,

    #[arg(long)]
    age: Option<String>,

    #[arg(long, help = "Male, Female, Other, or empty to clear")]
    gender: Option<String>,

    #[arg(long)]
    assignment: Option<String>,

    #[arg(long)]
    company: Option<String>,
}

impl UpdateArgs {
    fn edits(&self) -> Vec<(UserField, &str)> {
        [
            (UserField::Name, &self.display_name),
            (UserField::Age, &self.age),
            (UserField::Gender, &self.gender),
            (UserField::AssignmentText, &self.assignment),
            (UserField::CompanyName, &self.company),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let mut config = ApiConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url);
    }
    if let Some(state_dir) = cli.state_dir {
        config.state_dir = state_dir;
    }

    let client = Arc::new(ApiClient::new(&config)?);
    let store = Arc::new(FileStore::new(&config.state_dir));
    let mut auth = AuthState::new(client, store, config.mode)?;

    match cli.command {
        Command::Login { username, password } => run_login(&mut auth, &username, &password).await,
        Command::Logout => {
            auth.logout();
            println!("Logged out.");
            Ok(())
        }
        Command::Status => {
            print_status(&auth);
            Ok(())
        }
        Command::Users(users) => run_users(&auth, users).await,
        Command::Open { path } => run_open(&auth, &path).await,
    }
}

async fn run_login(auth: &mut AuthState, username: &str, password: &str) -> Result<(), CliError> {
    let mut view = LoginView::new(username, password);
    if view.submit(auth).await {
        let user = auth.session().map(|s| s.user_label()).unwrap_or_default();
        println!("Logged in as {user}.");
        return Ok(());
    }
    print!("{}", view.render(auth));
    Err(CliError::View(view.error(auth).unwrap_or("Unable to login. Please try again.").to_owned()))
}

fn print_status(auth: &AuthState) {
    let Some(session) = auth.session() else {
        println!("Not logged in.");
        return;
    };
    println!("user:          {}", session.user_label());
    println!("authenticated: {}", session.is_authenticated());
    println!("token:         {}", if session.token.is_some() { "present" } else { "absent" });
    println!("session id:    {}", if session.session_id.is_some() { "present" } else { "absent" });
    println!("success flag:  {}", session.success_flag);
    println!("logged in at:  {}", session.logged_in_at);
}

async fn run_users(auth: &AuthState, users: UsersCommand) -> Result<(), CliError> {
    if !auth.is_authenticated() {
        return Err(CliError::NotLoggedIn);
    }
    match users.command {
        UsersSubcommand::List => {
            let mut view = UsersView::new();
            view.load(auth).await;
            print!("{}", view.render());
            view.error().map_or(Ok(()), |e| Err(CliError::View(e.to_owned())))
        }
        UsersSubcommand::Show { name } => {
            let mut view = UserDetailView::new(&name);
            view.load(auth).await;
            print!("{}", view.render());
            detail_outcome(&view)
        }
        UsersSubcommand::Update(args) => run_update(auth, &args).await,
    }
}

async fn run_update(auth: &AuthState, args: &UpdateArgs) -> Result<(), CliError> {
    let mut view = UserDetailView::new(&args.name);
    view.load(auth).await;
    detail_outcome(&view)?;

    for (field, value) in args.edits() {
        view.set_field(field, value)?;
    }
    if !view.can_save() {
        println!("No changes to save.");
        return Ok(());
    }
    view.save(auth).await;
    print!("{}", view.render());
    detail_outcome(&view)
}

async fn run_open(auth: &AuthState, path: &str) -> Result<(), CliError> {
    let requested = Route::parse(path);
    let (route, mut page) = Page::mount(requested.clone(), auth);
    if route != requested {
        eprintln!("redirected {requested} -> {route}");
    }
    page.load(auth).await;
    print!("{}", page.render(auth));
    Ok(())
}

fn detail_outcome(view: &UserDetailView) -> Result<(), CliError> {
    match view.status() {
        Some(status) if status.is_error() => Err(CliError::View(status.text.clone())),
        _ => Ok(()),
    }
}
