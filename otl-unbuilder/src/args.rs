use std::{path::PathBuf, str::FromStr};

#[derive(Clone, Debug, clap::Parser)]
pub struct Args {
    pub font_path: PathBuf,
    #[arg(short, long)]
    /// Optional destination path for writing output. Default is stdout.
    pub out: Option<PathBuf>,
    /// Target to dump, one of gsub/gpos/gdef/origins/all (case insensitive)
    #[arg(short, long, default_value_t)]
    pub table: Table,
    /// Index of font to examine, if target is a font collection
    #[arg(short, long)]
    pub index: Option<u32>,
    /// Number of passes to run when resolving origins
    #[arg(long)]
    pub passes: Option<usize>,
    /// Cap on glyphs expanded per contextual rule position
    #[arg(long)]
    pub max_expansion: Option<usize>,
    /// Comma separated feature tags to skip when resolving origins
    #[arg(long)]
    pub ignore_features: Option<String>,
}

/// What to dump
#[derive(Clone, Debug, Default)]
pub enum Table {
    #[default]
    All,
    Gsub,
    Gpos,
    Gdef,
    Origins,
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Table::All => f.write_str("all"),
            Table::Gsub => f.write_str("gsub"),
            Table::Gpos => f.write_str("gpos"),
            Table::Gdef => f.write_str("gdef"),
            Table::Origins => f.write_str("origins"),
        }
    }
}

impl FromStr for Table {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        static ERR_MSG: &str = "expected one of 'gsub', 'gpos', 'gdef', 'origins', 'all'";
        match s.to_ascii_lowercase().trim() {
            "gsub" => Ok(Self::Gsub),
            "gpos" => Ok(Self::Gpos),
            "gdef" => Ok(Self::Gdef),
            "origins" => Ok(Self::Origins),
            "all" => Ok(Self::All),
            _ => Err(ERR_MSG),
        }
    }
}
