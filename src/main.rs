mod config;
mod field;
mod report;
mod watch;

use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use config::{FieldKind, Overrides, RoiCfg, SampleKind};

/// Extracts the isosurface of a synthetic scalar volume and reports on the mesh.
#[derive(Parser, Debug)]
#[command(name = "isomesh")]
#[command(about = "Marching-cubes isosurface extraction over a synthetic volume")]
struct Cli {
    /// Scene TOML file; built-in defaults are used without one.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Voxel resolution as `w,h,d`.
    #[arg(long, value_parser = parse_triple::<usize>)]
    dims: Option<[usize; 3]>,

    /// Voxel spacing as `x,y,z`.
    #[arg(long, value_parser = parse_triple::<f32>)]
    pitch: Option<[f32; 3]>,

    #[arg(long, value_enum)]
    sample: Option<SampleKind>,

    #[arg(long, value_enum)]
    field: Option<FieldKind>,

    /// Iso value, in field units (also for `u8` volumes).
    #[arg(short, long, allow_hyphen_values = true)]
    threshold: Option<f32>,

    /// Number of z-slabs; more than one runs the parallel extractor.
    #[arg(long)]
    slabs: Option<usize>,

    /// Size of a dedicated worker pool (0 = global pool).
    #[arg(long)]
    threads: Option<usize>,

    /// Inclusive voxel box corner `x,y,z`; needs `--roi-max`.
    #[arg(long, value_parser = parse_triple::<i64>, requires = "roi_max", allow_hyphen_values = true)]
    roi_min: Option<[i64; 3]>,

    #[arg(long, value_parser = parse_triple::<i64>, requires = "roi_min", allow_hyphen_values = true)]
    roi_max: Option<[i64; 3]>,

    /// Re-run whenever the scene file changes.
    #[arg(short, long, requires = "config")]
    watch: bool,

    /// `env_logger` filter, e.g. `debug` or `isomesh=debug`; overrides `RUST_LOG`.
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            dims: self.dims,
            pitch: self.pitch,
            sample: self.sample,
            field: self.field,
            threshold: self.threshold,
            slabs: self.slabs,
            threads: self.threads,
            roi: self
                .roi_min
                .zip(self.roi_max)
                .map(|(min, max)| RoiCfg { min, max }),
        }
    }
}

fn parse_triple<T: FromStr>(s: &str) -> Result<[T; 3], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [a, b, c] = parts.as_slice() else {
        return Err(format!("expected three comma-separated values, got `{s}`"));
    };
    let one = |v: &str| v.parse::<T>().map_err(|_| format!("invalid value `{v}`"));
    Ok([one(*a)?, one(*b)?, one(*c)?])
}

fn init_logging(filter: Option<&str>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(f) = filter {
        builder.parse_filters(f);
    }
    builder.init();
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let overrides = cli.overrides();
    let scene = config::load(cli.config.as_deref(), &overrides)?;
    if let Some(p) = &cli.config {
        log::info!("loaded scene from {}", p.display());
    }
    report::run(&scene)?.log();

    if cli.watch {
        let path = cli.config.as_deref().ok_or("--watch needs --config")?;
        watch::watch_scene(path, &overrides)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triples_parse_with_spaces_and_signs() {
        assert_eq!(parse_triple::<usize>("4, 5,6"), Ok([4, 5, 6]));
        assert_eq!(parse_triple::<i64>("-1,0,2"), Ok([-1, 0, 2]));
        assert_eq!(parse_triple::<f32>("0.5,1,2"), Ok([0.5, 1.0, 2.0]));
        assert!(parse_triple::<usize>("1,2").is_err());
        assert!(parse_triple::<usize>("1,x,3").is_err());
    }

    #[test]
    fn cli_flags_become_overrides() {
        let cli = Cli::try_parse_from([
            "isomesh",
            "--dims",
            "8,8,8",
            "--threshold",
            "-0.5",
            "--roi-min",
            "0,0,0",
            "--roi-max",
            "3,3,3",
            "--sample",
            "u8",
        ])
        .unwrap();
        let o = cli.overrides();
        assert_eq!(o.dims, Some([8, 8, 8]));
        assert_eq!(o.threshold, Some(-0.5));
        assert_eq!(o.sample, Some(SampleKind::U8));
        assert_eq!(
            o.roi,
            Some(RoiCfg {
                min: [0, 0, 0],
                max: [3, 3, 3]
            })
        );
    }

    #[test]
    fn roi_corners_come_in_pairs() {
        assert!(Cli::try_parse_from(["isomesh", "--roi-min", "0,0,0"]).is_err());
        assert!(Cli::try_parse_from(["isomesh", "--watch"]).is_err());
    }
}
