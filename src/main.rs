use clap::Parser;
use hexcover::{
    EdgePolicy, FileExtentProvider, FileOutputSink, HexcoverError, SizingRequest,
    SpatialReference, TilingConfig, generate_hexagons, parse_sizing_value,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "hexcover")]
#[command(about = "Cover the extent of a dataset with a tiling of hexagons")]
struct Cmd {
    /// Dataset whose extent is tiled (.csv, .geojson or .json)
    input: PathBuf,
    /// Hexagon width, or '#' to leave unset
    width: String,
    /// Approximate number of hexagons in the whole extent, or '#'
    total_count: String,
    /// Number of hexagon columns across the extent, or '#'
    column_count: String,
    /// Number of hexagon rows down the extent, or '#'
    row_count: String,
    /// Output dataset (.csv, .geojson or .parquet)
    output: PathBuf,

    /// Spatial reference written to the output, overriding the input's
    #[arg(long)]
    srs: Option<String>,

    /// 'cover' tiles until the extent is completely covered. 'centers' keeps only
    /// reference points inside the extent, reproducing the classic hexagon
    /// tessellation script's counts and ids
    #[arg(long, default_value = "cover")]
    edge_policy: EdgePolicy,

    /// CSV column holding WKT or GeoJSON geometries [default: geometry]
    #[arg(long, conflicts_with = "x_column")]
    geometry_column: Option<String>,

    /// CSV column holding X coordinates
    #[arg(long, requires = "y_column")]
    x_column: Option<String>,

    /// CSV column holding Y coordinates
    #[arg(long, requires = "x_column")]
    y_column: Option<String>,

    /// Print a JSON summary instead of the plain message
    #[arg(long)]
    json: bool,
}

impl Cmd {
    fn sizing(&self) -> Result<SizingRequest, HexcoverError> {
        Ok(SizingRequest {
            width: parse_sizing_value(&self.width)?,
            total_count: parse_sizing_value(&self.total_count)?,
            column_count: parse_sizing_value(&self.column_count)?,
            row_count: parse_sizing_value(&self.row_count)?,
        })
    }

    fn provider(&self) -> FileExtentProvider {
        let provider = match (&self.x_column, &self.y_column, &self.geometry_column) {
            (Some(x), Some(y), _) => FileExtentProvider::new().coordinate_columns(x, y),
            (_, _, Some(column)) => FileExtentProvider::new().geometry_column(column),
            _ => FileExtentProvider::new(),
        };
        match &self.srs {
            Some(srs) => provider.spatial_reference(SpatialReference::new(srs)),
            None => provider,
        }
    }
}

fn run(cmd: &Cmd) -> Result<(), HexcoverError> {
    let config =
        TilingConfig::new(&cmd.input, &cmd.output, cmd.sizing()?).edge_policy(cmd.edge_policy);
    let summary = generate_hexagons(&config, &cmd.provider(), &mut FileOutputSink::new())?;

    if cmd.json {
        let json = serde_json::to_string_pretty(&summary)
            .map_err(|e| HexcoverError::IoError(e.to_string()))?;
        println!("{}", json);
    } else {
        println!("Finished! {} hexagons created", summary.count);
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hexcover=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cmd = Cmd::parse();
    match run(&cmd) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(kind = %e.kind(), "{}", e);
            eprintln!("Error ({}): {}", e.kind(), e);
            ExitCode::FAILURE
        }
    }
}
