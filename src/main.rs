use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use fbcli::{
    cli::{self, PageOptions, PostlinkOptions},
    config::{Config, ConfigError, first_run_help},
    error,
    format::{EmptyFields, OutputFormat, Renderer},
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Provide a Facebook access token, overriding the saved one
    #[clap(long, global = true)]
    token: Option<String>,

    /// Max pages to fetch from listing commands (-1 for unlimited)
    #[clap(
        long,
        short = 'p',
        global = true,
        default_value_t = -1,
        allow_negative_numbers = true
    )]
    pages: i64,

    /// Output format
    #[clap(long, global = true, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Render empty message/description fields instead of skipping them
    #[clap(long, global = true)]
    show_empty: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Save Facebook application ID and secret
    Config(ConfigOptions),

    /// Log into Facebook and receive an access token
    Login(LoginOptions),

    /// Deauthorize your access token
    Logout,

    /// Show your name and profile ID
    Me,

    /// List the pages you have liked
    Likes,

    /// List the people you are friends with (taggable friends only)
    Friends,

    /// List the posts on your profile
    Feed,

    /// List photos you have uploaded
    Photos,

    /// List photos you are tagged in
    Photosof,

    /// List videos you have uploaded
    Videos,

    /// List videos you are tagged in
    Videosof,

    /// List your upcoming events
    Events,

    /// List your past events
    Pastevents,

    /// Show event details
    Event(EventOptions),

    /// Post a message to your timeline
    Post(PostOptions),

    /// Post a link to your timeline
    Postlink(PostlinkArgs),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
struct ConfigOptions {
    /// Facebook application ID
    #[clap(long)]
    app_id: u64,

    /// Facebook application secret
    #[clap(long)]
    app_secret: String,
}

#[derive(Parser, Debug, Clone)]
struct LoginOptions {
    /// Host to serve the login redirect page on
    #[clap(long, default_value = "localhost")]
    host: String,

    /// Local TCP port to serve the login redirect page on
    #[clap(long, default_value_t = 3333)]
    port: u16,

    /// Show information about the current access token and exit
    #[clap(long)]
    info: bool,
}

#[derive(Parser, Debug, Clone)]
struct EventOptions {
    /// Event IDs to show
    #[clap(required = true)]
    ids: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
struct PostOptions {
    /// Message to post
    message: String,
}

#[derive(Parser, Debug, Clone)]
struct PostlinkArgs {
    /// URL to post
    url: String,

    /// Main message
    #[clap(long, short = 'm')]
    message: Option<String>,

    /// Link name
    #[clap(long, short = 'n')]
    name: Option<String>,

    /// Link caption
    #[clap(long, short = 'c')]
    caption: Option<String>,

    /// Link description
    #[clap(long, short = 'd')]
    description: Option<String>,

    /// Link image URL
    #[clap(long, short = 'i')]
    image: Option<String>,
}

#[derive(Parser, Debug, Clone)]
struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let empty_fields = if cli.show_empty {
        EmptyFields::Blank
    } else {
        EmptyFields::Skip
    };
    let renderer = Renderer::new(cli.format).with_empty_fields(empty_fields);
    let opts = PageOptions {
        pages: cli.pages,
        renderer,
    };

    match cli.command {
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
        Command::Config(opt) => cli::save_app(opt.app_id, opt.app_secret).await,
        command => {
            let mut config = match Config::load().await {
                Ok(config) => config,
                Err(ConfigError::NotFound(_)) => {
                    println!("{}", first_run_help());
                    std::process::exit(1);
                }
                Err(e) => error!("{}", e),
            };

            // Token passed on the command line takes precedence.
            if let Some(token) = cli.token {
                config.access_token = Some(token);
            }

            match command {
                Command::Login(opt) => cli::login(config, opt.host, opt.port, opt.info).await,
                Command::Logout => cli::logout(&config).await,
                Command::Me => cli::me(&config).await,
                Command::Likes => cli::likes(&config, &opts).await,
                Command::Friends => cli::friends(&config, &opts).await,
                Command::Feed => cli::feed(&config, &opts).await,
                Command::Photos => cli::photos(&config, &opts, false).await,
                Command::Photosof => cli::photos(&config, &opts, true).await,
                Command::Videos => cli::videos(&config, &opts, false).await,
                Command::Videosof => cli::videos(&config, &opts, true).await,
                Command::Events => cli::events(&config, &opts, false).await,
                Command::Pastevents => cli::events(&config, &opts, true).await,
                Command::Event(opt) => cli::event_details(&config, &opt.ids, &renderer).await,
                Command::Post(opt) => cli::post(&config, &opt.message, &renderer).await,
                Command::Postlink(opt) => {
                    let link_opts = PostlinkOptions {
                        message: opt.message,
                        name: opt.name,
                        caption: opt.caption,
                        description: opt.description,
                        image: opt.image,
                    };
                    cli::postlink(&config, &opt.url, link_opts, &renderer).await
                }
                Command::Config(_) | Command::Completions(_) => unreachable!(),
            }
        }
    }
}
