use clap::Parser;
use customer_list_core::format::current_month;
use customer_list_core::{
    Business, CustomerList, HttpSource, JsonFileSource, ListConfig, ListState, Month,
    SourceLoader, customer_list, default_data_path,
};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "customer-list")]
#[command(about = "Browse a paginated list of customer businesses")]
struct Cli {
    /// JSON file with customer records (defaults to the platform data directory)
    #[arg(short, long, conflicts_with = "url")]
    file: Option<PathBuf>,
    /// Endpoint returning customer records as JSON
    #[arg(short, long)]
    url: Option<String>,
    /// List settings as JSON, e.g. {"name": "My Customers", "page_size": 4}
    #[arg(long)]
    config: Option<PathBuf>,
    /// Title shown above the list
    #[arg(long)]
    name: Option<String>,
    /// Number of customers per page
    #[arg(long)]
    page_size: Option<usize>,
}

#[derive(Debug, PartialEq)]
enum Command {
    Next,
    Previous,
    Goto(i64),
    Remove(usize),
    View(usize),
    Close,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

const HELP: &str = "Commands: n|next, p|prev, g|goto <page>, v|view <#>, c|close, r|remove <#>, h|help, q|quit";

fn parse_command(line: &str) -> Command {
    let mut parts = line.split_whitespace();
    let Some(word) = parts.next() else {
        return Command::Empty;
    };
    let arg = parts.next();

    match (word.to_lowercase().as_str(), arg) {
        ("n" | "next", None) => Command::Next,
        ("p" | "prev" | "previous", None) => Command::Previous,
        ("c" | "close", None) => Command::Close,
        ("h" | "help", None) => Command::Help,
        ("q" | "quit" | "exit", None) => Command::Quit,
        ("g" | "goto", Some(page)) => match page.parse() {
            Ok(page) => Command::Goto(page),
            Err(_) => Command::Unknown(line.trim().to_string()),
        },
        ("r" | "remove", Some(index)) => match index.parse() {
            Ok(index) if index > 0 => Command::Remove(index),
            _ => Command::Unknown(line.trim().to_string()),
        },
        ("v" | "view", Some(index)) => match index.parse() {
            Ok(index) if index > 0 => Command::View(index),
            _ => Command::Unknown(line.trim().to_string()),
        },
        _ => Command::Unknown(line.trim().to_string()),
    }
}

fn load_config(cli: &Cli) -> Result<ListConfig, customer_list_core::ListError> {
    let mut config = match &cli.config {
        Some(path) => ListConfig::from_json_file(path)?,
        None => ListConfig::default(),
    };
    if let Some(name) = &cli.name {
        config.name = name.clone();
    }
    if let Some(page_size) = cli.page_size {
        config.page_size = page_size;
    }
    config.validate()?;
    Ok(config)
}

fn render_list(config: &ListConfig, list: &CustomerList, month: Month) -> String {
    let mut lines = vec![format!("== {} ==", config.name)];

    match list.state() {
        ListState::Loading => lines.push("Loading...".to_string()),
        ListState::Populated => {
            for (i, entry) in list.visible_slice().iter().enumerate() {
                lines.push(format!("{}. {}", i + 1, entry.summary()));
            }
        }
    }

    for entry in list.visible_slice().iter().filter(|e| e.is_popup_visible()) {
        lines.push(String::new());
        lines.push(entry.detail(month));
    }

    lines.push(format!(
        "{} [{}] {}",
        if list.can_go_previous() { "<" } else { "-" },
        list.page_number(),
        if list.can_go_next() { ">" } else { "-" },
    ));
    lines.join("\n")
}

/// Apply one user command. Returns false when the user asked to quit.
fn handle_command(list: &mut CustomerList, command: Command) -> bool {
    match command {
        Command::Next => {
            if list.can_go_next() {
                list.next_page();
            } else {
                println!("Already on the last page");
            }
        }
        Command::Previous => {
            if list.can_go_previous() {
                list.previous_page();
            } else {
                println!("Already on the first page");
            }
        }
        Command::Goto(page) => list.change_page(page),
        Command::Remove(index) => {
            let visible = list.visible_slice();
            match index.checked_sub(1).and_then(|i| visible.get(i)) {
                Some(entry) => entry.remove(),
                None => println!("No customer #{} on this page", index),
            }
            list.process_pending();
        }
        Command::View(index) => {
            let visible = list.visible_slice_mut();
            match index.checked_sub(1) {
                Some(i) if i < visible.len() => {
                    visible.iter_mut().for_each(|e| e.close_popup());
                    visible[i].show_popup();
                }
                _ => println!("No customer #{} on this page", index),
            }
        }
        Command::Close => list.visible_slice_mut().iter_mut().for_each(|e| e.close_popup()),
        Command::Help => println!("{}", HELP),
        Command::Quit => return false,
        Command::Empty => {}
        Command::Unknown(input) => println!("Unknown command '{}'. {}", input, HELP),
    }
    true
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let mut list = customer_list(&config)?;

    match (&cli.url, &cli.file) {
        (Some(url), _) => {
            println!("Loading customers from {}...", url);
            list.activate(SourceLoader::new(HttpSource::<Business>::new(url.as_str())?));
        }
        (None, Some(path)) => {
            println!("Loading customers from {}...", path.display());
            list.activate(SourceLoader::new(JsonFileSource::<Business>::new(path)));
        }
        (None, None) => match default_data_path() {
            Some(path) => {
                println!("Loading customers from {}...", path.display());
                list.activate(SourceLoader::new(JsonFileSource::<Business>::new(path)));
            }
            None => {
                eprintln!("No data directory available. Use --file or --url.");
                std::process::exit(1);
            }
        },
    }

    println!("{}", HELP);
    println!("{}", render_list(&config, &list, current_month()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if !handle_command(&mut list, parse_command(&line)) {
                    break;
                }
                println!("{}", render_list(&config, &list, current_month()));
            }
            _ = list.apply_next() => {
                log::info!("Customer list refreshed with {} entries", list.len());
                println!("{}", render_list(&config, &list, current_month()));
            }
        }
    }

    Ok(())
}
