use clap::Parser;
use std::path::PathBuf;

/// Default location of the screening workbook
pub const DEFAULT_WORKBOOK: &str = "Screening EOR  para programar.xlsm";
/// Default location of the file offered for download
pub const DEFAULT_DOWNLOAD_FILE: &str = "DATOS EOR.xlsx";

/// Command-line configuration of the dashboard server
#[derive(Parser, Debug, Clone)]
#[command(name = "eor-dashboard", version, about = "Serve the EOR method screening dashboard")]
pub struct Config {
    /// Workbook with the `Ui` and `Tabla_Puntaje` sheets
    #[arg(long, env = "EOR_WORKBOOK", default_value = DEFAULT_WORKBOOK)]
    pub workbook: PathBuf,

    /// File offered on the "Author Information" tab
    #[arg(long, env = "EOR_DOWNLOAD_FILE", default_value = DEFAULT_DOWNLOAD_FILE)]
    pub download_file: PathBuf,

    #[arg(long, env = "EOR_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "EOR_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Author shown at the top of the page and on the information tab
    #[arg(long, env = "EOR_AUTHOR")]
    pub author: Option<String>,

    /// Contact line for the information tab (repeatable)
    #[arg(long = "contact")]
    pub contacts: Vec<String>,

    /// Write the dashboard to this HTML file and exit instead of serving it
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,
}

impl Config {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_expected_file_names() {
        let config = Config::try_parse_from(["eor-dashboard"]).unwrap();
        assert_eq!(config.workbook, PathBuf::from("Screening EOR  para programar.xlsm"));
        assert_eq!(config.download_file, PathBuf::from("DATOS EOR.xlsx"));
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert!(config.export.is_none());
    }

    #[test]
    fn contacts_repeat() {
        let config = Config::try_parse_from([
            "eor-dashboard",
            "--contact",
            "a@example.com",
            "--contact",
            "b@example.com",
            "--port",
            "8080",
        ])
        .unwrap();
        assert_eq!(config.contacts, vec!["a@example.com", "b@example.com"]);
        assert_eq!(config.port, 8080);
    }
}
