//! CLI logic for the Mosaic layout tool.
//!
//! Reads a collection file, orders it (or takes a precomputed ordering
//! response), lays it out for both breakpoints and writes the result as JSON,
//! with an optional SVG preview.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, PreviewColumns};

use std::fs;

use log::{debug, info, warn};
use serde::Serialize;

use mosaic::{
    MosaicBuilder, MosaicError,
    layout::{Layout, OrderSource},
    snapshot::DimensionSnapshot,
    wire::{self, CollectionPayload, OrderingResponse},
};

/// The JSON document written to the output file.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LayoutReport<'a> {
    ordering: Option<&'a OrderingResponse>,
    source: OrderSource,
    two_column: &'a Layout,
    four_column: &'a Layout,
}

/// Run the Mosaic CLI application
///
/// This function orders and lays out the input collection and writes the
/// resulting layouts to the output file.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `MosaicError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed collection files
/// - Layout errors
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), MosaicError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing collection"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let payload = CollectionPayload::from_json(&fs::read_to_string(&args.input)?)?;
    let builder = MosaicBuilder::new(app_config);

    let response = match &args.ordering {
        Some(path) => read_ordering(path)?,
        None => Some(builder.order(&payload)),
    };

    // The CLI never probes images; stored hints are all it knows.
    let layout = builder.layout(
        payload.items(),
        response.as_ref().map(OrderingResponse::order),
        &DimensionSnapshot::new(),
    )?;

    for placed in [layout.two_column(), layout.four_column()] {
        if let Some((first, second)) = placed.find_overlap() {
            warn!(
                columns = placed.columns(),
                first:% = first,
                second:% = second;
                "Overlapping tiles in layout"
            );
        } else {
            debug!(columns = placed.columns(); "Layout has no overlapping tiles");
        }
    }

    let report = LayoutReport {
        ordering: response.as_ref(),
        source: layout.source(),
        two_column: layout.two_column(),
        four_column: layout.four_column(),
    };
    fs::write(&args.output, serde_json::to_string_pretty(&report)?)?;
    info!(output_file = args.output; "Layout written successfully");

    if let Some(svg_path) = &args.svg {
        let svg = builder.render_svg(layout.for_columns(args.columns.count()))?;
        fs::write(svg_path, svg)?;
        info!(output_file = svg_path; "SVG exported successfully");
    }

    Ok(())
}

/// Reads a precomputed ordering response.
///
/// A response that cannot be decoded is treated like an unavailable backend:
/// the layout falls back to the input order.
fn read_ordering(path: &str) -> Result<Option<OrderingResponse>, MosaicError> {
    let body = fs::read_to_string(path)?;
    match wire::decode_response(&body) {
        Ok(response) => Ok(Some(response)),
        Err(err) => {
            warn!(path, err:%; "Ignoring undecodable ordering response");
            Ok(None)
        }
    }
}
