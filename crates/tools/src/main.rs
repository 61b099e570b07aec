use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use formats::geojson::GeoJson;
use foundation::coords::{LatLon, LonLat};
use layers::annotations::{RiskBubble, SearchPoint};
use layers::mask::build_mask;
use layers::stack::NamedRegion;
use scene::{MapComposer, MapConfig, MapInputs};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Composes flood-analysis map views from GeoJSON and raster URLs")]
struct Args {
    /// JSON map configuration; every field is optional
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose the full layer stack and camera
    Compose {
        /// Area of interest (GeoJSON)
        #[arg(long)]
        aoi: Option<PathBuf>,

        /// Flood result polygons (GeoJSON)
        #[arg(long)]
        result: Option<PathBuf>,

        #[arg(long)]
        flood_url: Option<String>,

        #[arg(long)]
        pre_url: Option<String>,

        #[arg(long)]
        event_url: Option<String>,

        #[arg(long)]
        delta_url: Option<String>,

        /// Sub-region boundary as NAME=FILE; up to three are drawn
        #[arg(long = "region", value_parser = parse_region)]
        regions: Vec<(String, PathBuf)>,

        /// Search result as LAT,LON[,LABEL]
        #[arg(long, value_parser = parse_search)]
        search: Option<SearchPoint>,

        /// Explicit camera center as LAT,LON
        #[arg(long, value_parser = parse_lat_lon)]
        center: Option<LatLon>,

        /// Three-day rainfall; colors the AOI and the risk bubble
        #[arg(long)]
        risk_rain_mm: Option<f64>,

        /// Radius of the risk bubble drawn around the search point
        #[arg(long, default_value_t = 1500.0)]
        risk_radius_m: f64,
    },

    /// Print the outside-AOI mask as a GeoJSON Feature, or null
    Mask {
        #[arg(long)]
        aoi: PathBuf,

        /// Also print the mask as a flat triangle list
        #[arg(long)]
        triangles: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => MapConfig::load(path).map_err(|e| e.to_string())?,
        None => MapConfig::default(),
    };

    match args.command {
        Command::Compose {
            aoi,
            result,
            flood_url,
            pre_url,
            event_url,
            delta_url,
            regions,
            search,
            center,
            risk_rain_mm,
            risk_radius_m,
        } => {
            let mut inputs = MapInputs {
                aoi: read_optional(aoi.as_deref())?.map(Arc::new),
                result: read_optional(result.as_deref())?.map(Arc::new),
                search_point: search,
                center_override: center,
                ..MapInputs::default()
            };
            inputs.rasters.flood = flood_url;
            inputs.rasters.pre_event = pre_url;
            inputs.rasters.event = event_url;
            inputs.rasters.delta = delta_url;

            for (name, path) in regions {
                match read_geojson(&path)? {
                    Some(geo) => inputs.regions.push(NamedRegion::new(name, geo)),
                    None => debug!(region = %name, "region file is null, skipped"),
                }
            }

            if let Some(mm) = risk_rain_mm {
                let level = config.risk.classify(mm);
                info!(rain_3d_mm = mm, level = level.label(), "risk classified");
                inputs.aoi_fill = Some(level.color());
                inputs.risk_bubble = inputs.search_point.as_ref().map(|p| RiskBubble {
                    center: p.position,
                    radius_m: risk_radius_m,
                    color: level.color(),
                });
            }

            let mut composer = MapComposer::new(config);
            let view = composer.compose(&inputs);
            info!(
                layers = view.layers.layers.len(),
                framing = ?view.framing.mode,
                "view composed"
            );
            print_json(&view, args.pretty)
        }
        Command::Mask { aoi, triangles } => {
            let aoi = read_geojson(&aoi)?;
            let mask = build_mask(aoi.as_ref(), &config.view.mask_world);
            if !triangles {
                return print_json(&mask, args.pretty);
            }

            #[derive(Serialize)]
            struct MaskOutput<'a> {
                feature: Option<&'a layers::mask::MaskPolygon>,
                triangles: Vec<LonLat>,
            }
            let tris = mask.as_ref().map(|m| m.triangulate()).unwrap_or_default();
            print_json(
                &MaskOutput {
                    feature: mask.as_ref(),
                    triangles: tris,
                },
                args.pretty,
            )
        }
    }
}

fn read_geojson(path: &Path) -> Result<Option<GeoJson>, String> {
    let payload = fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?;
    GeoJson::from_geojson_str(&payload).map_err(|e| format!("{path:?}: {e}"))
}

fn read_optional(path: Option<&Path>) -> Result<Option<GeoJson>, String> {
    match path {
        Some(p) => read_geojson(p),
        None => Ok(None),
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), String> {
    let out = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| format!("serialize output: {e}"))?;
    println!("{out}");
    Ok(())
}

fn parse_coord(s: &str, what: &str) -> Result<f64, String> {
    let v: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid {what}: {s:?}"))?;
    if !v.is_finite() {
        return Err(format!("{what} must be finite"));
    }
    Ok(v)
}

fn parse_lat_lon(s: &str) -> Result<LatLon, String> {
    let Some((lat, lon)) = s.split_once(',') else {
        return Err(format!("expected LAT,LON, got {s:?}"));
    };
    let lat = parse_coord(lat, "latitude")?;
    let lon = parse_coord(lon, "longitude")?;
    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("latitude out of range: {lat}"));
    }
    Ok(LatLon::new(lat, lon))
}

fn parse_search(s: &str) -> Result<SearchPoint, String> {
    let mut parts = s.splitn(3, ',');
    let (Some(lat), Some(lon)) = (parts.next(), parts.next()) else {
        return Err(format!("expected LAT,LON[,LABEL], got {s:?}"));
    };
    let position = parse_lat_lon(&format!("{lat},{lon}"))?;
    let label = parts.next().map(str::to_string);
    Ok(SearchPoint::new(position, label))
}

fn parse_region(s: &str) -> Result<(String, PathBuf), String> {
    match s.split_once('=') {
        Some((name, path)) if !name.trim().is_empty() && !path.is_empty() => {
            Ok((name.trim().to_string(), PathBuf::from(path)))
        }
        _ => Err(format!("expected NAME=FILE, got {s:?}")),
    }
}
