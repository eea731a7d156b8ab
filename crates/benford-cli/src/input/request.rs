use benford_core::{AnalysisConfig, BenfordInput, Confidence, Precision, Sample, SignFilter};
use clap::Args;
use serde_json::Value;

use super::csv_table::CsvTable;

/// Where the sample comes from plus the analysis options.
/// Flags override the values found in the request document.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// JSON or YAML request document ({"data": [...], "decimals": 2, ...})
    #[arg(long)]
    pub input: Option<String>,

    /// CSV file holding the sample column
    #[arg(long, requires = "column")]
    pub csv: Option<String>,

    /// Column of the CSV file to analyse
    #[arg(long)]
    pub column: Option<String>,

    /// Decimal places kept for floats, or "infer"
    #[arg(long)]
    pub decimals: Option<String>,

    /// all, pos or neg
    #[arg(long)]
    pub sign: Option<String>,

    /// 80, 85, 90, 95, 99, 99.9, 99.99, 99.999, 99.9999, 99.99999 or none
    #[arg(long)]
    pub confidence: Option<String>,

    /// Cap on the sample size used for Z-scores
    #[arg(long = "limit-n")]
    pub limit_n: Option<u64>,
}

pub struct Request {
    pub doc: BenfordInput,
    pub sample: Sample,
    pub config: AnalysisConfig,
}

pub fn load(args: &InputArgs) -> Result<Request, Box<dyn std::error::Error>> {
    let doc = if let Some(ref path) = args.input {
        Some(super::file::read_document(path)?)
    } else if args.csv.is_none() {
        super::stdin::read_stdin()?
    } else {
        None
    };

    let sample = match (&args.csv, &args.column) {
        (Some(path), Some(column)) => {
            let table = CsvTable::read(path)?;
            Sample::from_table(&table, column).map_err(|e| {
                format!("{e} (columns: {})", table.column_names().join(", "))
            })?
        }
        _ => match &doc {
            Some(d) => d.sample()?,
            None => {
                return Err(
                    "--input <file.json|file.yaml>, --csv <file> --column <name> or stdin required"
                        .into(),
                )
            }
        },
    };

    let doc = doc.unwrap_or_default();
    let mut config = doc.config()?;
    if let Some(ref d) = args.decimals {
        config.decimals = d.parse::<Precision>()?;
    }
    if let Some(ref s) = args.sign {
        config.sign = s.parse::<SignFilter>()?;
    }
    if let Some(ref c) = args.confidence {
        config.confidence = Confidence::parse_optional(&Value::String(c.clone()))?;
    }
    if args.limit_n.is_some() {
        config.limit_n = args.limit_n;
    }

    Ok(Request { doc, sample, config })
}
