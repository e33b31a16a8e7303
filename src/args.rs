use clap::Parser;
use map_harvest::HarvestConfig;

#[derive(Parser, Debug)]
#[command(name = "map-harvest")]
#[command(about = "Scrapes map-search listings and their reviews into two CSV datasets")]
#[command(version)]
pub struct Args {
    /// Search query to run against the map site
    pub query: String,

    /// Maximum number of listings to open
    #[arg(short = 'n', long)]
    pub max_places: Option<usize>,

    /// Maximum number of reviews to keep per listing
    #[arg(short = 'r', long)]
    pub max_reviews: Option<usize>,

    /// Directory the CSV files are written to
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// WebDriver server URL
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// JSON configuration file; flags given here override its values
    #[arg(short, long)]
    pub config: Option<String>,
}

impl Args {
    /// Fold CLI overrides into the configuration
    pub fn apply_to(&self, config: &mut HarvestConfig) {
        config.query = self.query.clone();
        if let Some(value) = self.max_places {
            config.max_places = value;
        }
        if let Some(value) = self.max_reviews {
            config.max_reviews = value;
        }
        if let Some(value) = &self.output_dir {
            config.output_dir = value.clone();
        }
        if let Some(value) = &self.webdriver_url {
            config.webdriver_url = value.clone();
        }
    }
}
