//! Utils

use clap::Parser;

/// Arguments for the order demo
#[derive(Debug, Parser)]
pub struct ExampleOrderArgs {
    /// Fixture set to load the product catalog from
    #[clap(short, long, default_value = "fruit")]
    pub fixture: String,

    /// Settings file; defaults are used when omitted
    #[clap(short, long)]
    pub settings: Option<String>,

    /// Allocations as `PRODUCT_ID=GRAMS`, applied in order
    #[clap(short, long = "add", value_parser = parse_request)]
    pub add: Vec<(String, String)>,

    /// Change the first item of the first basket to this many grams
    #[clap(short, long)]
    pub edit: Option<String>,

    /// Undo this many steps before printing
    #[clap(short, long, default_value_t = 0)]
    pub undo: usize,
}

/// Split a `PRODUCT_ID=GRAMS` request; the grams are validated later.
///
/// # Errors
///
/// Returns an error if there is no `=` separator.
pub fn parse_request(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(id, grams)| (id.trim().to_string(), grams.to_string()))
        .ok_or_else(|| format!("expected PRODUCT_ID=GRAMS, got {s:?}"))
}
