use clap::{Args as ClapArgs, Parser, Subcommand};
use kanban_core::api::Column;

fn parse_column(s: &str) -> Result<Column, String> {
    s.parse::<Column>()
}

#[derive(Parser, Debug)]
#[command(name = "kanban", version, about = "Kanban board for a REST task service")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Task API base URL (overrides config and KANBAN_API_URL).
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ListArgs {
    /// Column to list; all columns when omitted.
    #[arg(long, value_parser = parse_column)]
    pub column: Option<Column>,

    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Case-insensitive filter over title and description of the fetched page.
    #[arg(long)]
    pub search: Option<String>,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct AddArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long, default_value = "")]
    pub description: String,

    #[arg(long, value_parser = parse_column, default_value = "todo")]
    pub column: Column,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct EditArgs {
    #[arg(long)]
    pub id: u64,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, value_parser = parse_column)]
    pub column: Option<Column>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct MoveArgs {
    #[arg(long)]
    pub id: u64,

    #[arg(long, value_parser = parse_column)]
    pub to: Column,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RmArgs {
    #[arg(long)]
    pub id: u64,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the interactive board (default).
    Board,
    List(ListArgs),
    Add(AddArgs),
    Edit(EditArgs),
    Move(MoveArgs),
    Rm(RmArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_move_with_loose_column() {
        let args = Args::parse_from(["kanban", "move", "--id", "3", "--to", "in-progress"]);
        match args.command {
            Some(Commands::Move(m)) => {
                assert_eq!(m.id, 3);
                assert_eq!(m.to, Column::InProgress);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn api_url_is_global() {
        let args = Args::parse_from(["kanban", "list", "--api-url", "http://h:1"]);
        assert_eq!(args.api_url.as_deref(), Some("http://h:1"));
    }

    #[test]
    fn unknown_column_is_rejected() {
        assert!(Args::try_parse_from(["kanban", "add", "--title", "x", "--column", "later"]).is_err());
    }

    #[test]
    fn no_subcommand_means_board() {
        assert!(Args::parse_from(["kanban"]).command.is_none());
    }
}
