//! Batch adapter: estimate the fractal dimension of a thresholded image.
//!
//! Usage: `fractal_batch input=<image> [config=<json>] [key=value ...]`
//!
//! Keys: `method` (box, dilation, correlation, radial, multifractal),
//! `min`, `max`, `coef`, `sequence` (geometric, arithmetic), `gliding`,
//! `estimator` (log, direct), `model` (AD+C, AD, D+C, D or 0-3), `level`,
//! `bootstrap` (iterations, 0 to skip), `seed`, `threshold` (0-255),
//! `threads`, `q` (`lo:hi:step`), `range` (`lo:hi`), `report` (TSV path).
//! Values given on the command line override the JSON configuration.
use std::{collections::HashMap, env, fs, path::Path};

use anyhow::{Context, Result, anyhow, bail};
use log::info;
use rust_fractal::{
    api,
    config::{MethodConfig, load_config},
    curve::{Range, report_string},
    estimation::{EstimatorKind, PowerLawModel, bootstrap_interval},
    execution::ExecContext,
    geometry::{BinaryRaster, Dataset},
    sampling::Sequence,
};

const DEFAULT_THRESHOLD: u8 = 128;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn parse_args() -> Result<HashMap<String, String>> {
    env::args()
        .skip(1)
        .map(|arg| {
            arg.split_once('=')
                .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
                .ok_or_else(|| anyhow!("expected key=value, got '{arg}'"))
        })
        .collect()
}

fn parse_value<T>(args: &HashMap<String, String>, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    args.get(key)
        .map(|v| v.parse::<T>().with_context(|| format!("invalid value for '{key}': {v}")))
        .transpose()
}

/// `lo:hi` or `lo:hi:step`.
fn parse_span(text: &str) -> Result<Vec<f64>> {
    text.split(':')
        .map(|p| p.trim().parse::<f64>().with_context(|| format!("invalid number '{p}'")))
        .collect()
}

fn q_values(text: &str) -> Result<Vec<f64>> {
    let parts = parse_span(text)?;
    let &[lo, hi, step] = parts.as_slice() else {
        bail!("q must be lo:hi:step, got '{text}'");
    };
    if !(step > 0.0) || hi < lo {
        bail!("q range {text} is empty");
    }
    let count = ((hi - lo) / step + 1e-9).floor() as usize;
    Ok((0..=count).map(|k| lo + k as f64 * step).collect())
}

fn apply_overrides(config: &mut MethodConfig, args: &HashMap<String, String>) -> Result<()> {
    let sampling = config.sampling_mut();
    if let Some(v) = parse_value(args, "min")? {
        sampling.min_size = v;
    }
    if let Some(v) = parse_value(args, "max")? {
        sampling.max_size = v;
    }
    if let Some(v) = parse_value(args, "coef")? {
        sampling.coef = v;
    }
    if let Some(v) = parse_value::<Sequence>(args, "sequence")? {
        sampling.sequence = v;
    }
    match config {
        MethodConfig::BoxCounting(c) => {
            if let Some(v) = parse_value(args, "gliding")? {
                c.gliding = v;
            }
        }
        MethodConfig::Multifractal(c) => {
            if let Some(text) = args.get("q") {
                c.q_values = q_values(text)?;
            }
            if let Some(text) = args.get("range") {
                let parts = parse_span(text)?;
                let &[lo, hi] = parts.as_slice() else {
                    bail!("range must be lo:hi, got '{text}'");
                };
                c.range = Some((lo, hi));
            }
        }
        _ => {}
    }
    if let Some(estimation) = config.estimation_mut() {
        if let Some(v) = parse_value::<EstimatorKind>(args, "estimator")? {
            estimation.estimator = Some(v);
        }
        if let Some(v) = parse_value::<PowerLawModel>(args, "model")? {
            estimation.model = v;
        }
        if let Some(v) = parse_value(args, "level")? {
            estimation.level = v;
            estimation.bootstrap.level = v;
        }
        if let Some(v) = parse_value(args, "bootstrap")? {
            estimation.bootstrap.iterations = Some(v);
        }
        if let Some(v) = parse_value(args, "seed")? {
            estimation.bootstrap.seed = v;
        }
    }
    Ok(())
}

fn load_raster(path: &Path, threshold: u8) -> Result<BinaryRaster> {
    let gray = image::open(path)
        .with_context(|| format!("cannot open image {}", path.display()))?
        .into_luma8();
    let (width, height) = (gray.width() as usize, gray.height() as usize);
    let data = gray.pixels().map(|p| u8::from(p.0[0] < threshold)).collect();
    Ok(BinaryRaster::new(width, height, data)?)
}

fn run() -> Result<()> {
    let args = parse_args()?;
    let input = args.get("input").ok_or_else(|| anyhow!("missing input=<image>"))?;
    let mut config = match args.get("config") {
        Some(path) => load_config::<MethodConfig>(path)?,
        None => {
            let method = args.get("method").map_or("box", String::as_str);
            MethodConfig::for_method(method).ok_or_else(|| anyhow!("unknown method '{method}'"))?
        }
    };
    apply_overrides(&mut config, &args)?;

    let threshold = parse_value(&args, "threshold")?.unwrap_or(DEFAULT_THRESHOLD);
    let threads = parse_value(&args, "threads")?
        .unwrap_or_else(|| std::thread::available_parallelism().map_or(1, |n| n.get()));
    let ctx = ExecContext::new(threads)?;
    let raster = load_raster(Path::new(input), threshold)?;
    let dataset = Dataset::Raster(&raster);
    info!("{}: {} foreground pixels", input, raster.foreground_count());

    let Some(kind) = config.measure_kind() else {
        let MethodConfig::Multifractal(mf) = &config else {
            bail!("method has neither a measurement nor a multifractal configuration");
        };
        let spectrum = api::multifractal_from_config(dataset, mf, &ctx)?;
        println!("{}", serde_json::to_string_pretty(&spectrum)?);
        return Ok(());
    };

    let sampling = api::sampling_for(&kind, config.sampling(), dataset)?;
    let curve = api::compute_curve(&kind, dataset, &sampling, &ctx)?;
    let estimation = config.estimation().copied().unwrap_or_default();
    let estimator = estimation.build_estimator(sampling.sequence())?;
    let range = Range::full(&curve);
    let result = estimator.estimate(&curve, &range)?;
    println!("method\t{}", kind.name());
    println!("estimator\t{}", result.estimator.name());
    println!("dimension\t{:.6}", result.dimension);
    println!("r2\t{:.6}", result.r2);
    println!("ci\t{:.6}\t{:.6}", result.confidence_interval.0, result.confidence_interval.1);
    if estimation.bootstrap.iterations != Some(0) {
        let (lo, hi) =
            bootstrap_interval(estimator.as_ref(), &curve, &range, &estimation.bootstrap, &ctx)?;
        println!("bootstrap_ci\t{lo:.6}\t{hi:.6}");
    }
    if let Some(path) = args.get("report") {
        fs::write(path, report_string(&curve, Some(&result))?)
            .with_context(|| format!("cannot write report {path}"))?;
    }
    Ok(())
}
