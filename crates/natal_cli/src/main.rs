mod config;
mod logger;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use natal_core::{
    ALL_ELEMENTS, ALL_MODALITIES, ASPECT_CATALOG, AspectConfig, AspectKind, AspectMatch,
    BirthRequest, CelestialPlacement, ChartThemes, HouseCusp, NatalChart, RequestConfig,
    TransitAspect, ZodiacSign, derive_houses, detect_aspects, detect_transit_aspects,
    placements_from_json, sign_from_longitude, sort_by_tightness,
};
use serde::Serialize;

use crate::config::{Settings, parse_orb};

#[derive(Parser)]
#[command(name = "natal", about = "Natal chart geometry CLI")]
struct Cli {
    /// TOML settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Zodiac sign and DMS position of a tropical longitude
    Sign {
        /// Ecliptic longitude in degrees
        #[arg(allow_negative_numbers = true)]
        lon: f64,
    },
    /// List the aspect catalog in match order
    Catalog,
    /// Whole-sign houses from an ephemeris response
    Houses {
        /// Ephemeris response JSON
        #[arg(long)]
        input: PathBuf,
        /// Language key for body names
        #[arg(long)]
        lang: Option<String>,
    },
    /// Aspects between every pair of bodies
    Aspects {
        /// Ephemeris response JSON
        #[arg(long)]
        input: PathBuf,
        /// Language key for body names
        #[arg(long)]
        lang: Option<String>,
        /// Only these aspects (comma separated)
        #[arg(long, value_delimiter = ',')]
        allowed: Vec<AspectKind>,
        /// Skip these bodies (comma separated)
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<String>,
        /// Orb override, e.g. Conjunction=8 (repeatable)
        #[arg(long = "orb", value_parser = parse_orb)]
        orbs: Vec<(AspectKind, f64)>,
        /// Tightest first instead of pair order
        #[arg(long)]
        sort: bool,
    },
    /// Major aspects from transiting planets to a natal chart
    Transits {
        /// Natal ephemeris response JSON
        #[arg(long)]
        natal: PathBuf,
        /// Transit ephemeris response JSON
        #[arg(long)]
        transit: PathBuf,
        /// Orb override, e.g. Square=1.5 (repeatable)
        #[arg(long = "orb", value_parser = parse_orb)]
        orbs: Vec<(AspectKind, f64)>,
    },
    /// Houses, tightest major aspects and themes in one report
    Chart {
        /// Ephemeris response JSON
        #[arg(long)]
        input: PathBuf,
        /// Language key for body names
        #[arg(long)]
        lang: Option<String>,
        /// Number of major aspects to list
        #[arg(long, default_value = "5")]
        top: usize,
    },
    /// Print the ephemeris proxy request body for a birth moment
    Request {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
        /// Day of month
        #[arg(long)]
        date: u32,
        #[arg(long)]
        hours: u32,
        #[arg(long)]
        minutes: u32,
        #[arg(long, default_value = "0")]
        seconds: u32,
        /// Latitude in degrees, north positive
        #[arg(long, allow_negative_numbers = true)]
        latitude: f64,
        /// Longitude in degrees, east positive
        #[arg(long, allow_negative_numbers = true)]
        longitude: f64,
        /// UTC offset in hours
        #[arg(long, allow_negative_numbers = true)]
        timezone: f64,
        /// Response language requested from the provider
        #[arg(long)]
        lang: Option<String>,
    },
}

#[derive(Serialize)]
struct CatalogEntry {
    aspect: AspectKind,
    angle: f64,
    orb: f64,
    major: bool,
}

#[derive(Serialize)]
struct ChartReport<'a> {
    houses: &'a [HouseCusp],
    aspects: &'a [AspectMatch],
    themes: &'a ChartThemes,
}

fn main() {
    let cli = Cli::parse();
    logger::init_cli_logger(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = match &cli.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };
    let json = cli.json;

    match cli.command {
        Commands::Sign { lon } => {
            let info = sign_from_longitude(lon);
            if json {
                return print_json(&info);
            }
            let dms = info.dms;
            println!(
                "{} - {} deg {} min {:.1} sec ({:.4} deg in sign)",
                info.sign, dms.degrees, dms.minutes, dms.seconds, info.degrees_in_sign
            );
        }

        Commands::Catalog => {
            let entries: Vec<CatalogEntry> = ASPECT_CATALOG
                .into_iter()
                .map(|aspect| CatalogEntry {
                    aspect,
                    angle: aspect.exact_angle(),
                    orb: aspect.default_orb(),
                    major: aspect.is_major(),
                })
                .collect();
            if json {
                return print_json(&entries);
            }
            for e in &entries {
                println!(
                    "{:<15} {:>8.4} deg  orb {:.1}{}",
                    e.aspect.name(),
                    e.angle,
                    e.orb,
                    if e.major { "  (major)" } else { "" }
                );
            }
        }

        Commands::Houses { input, lang } => {
            let placements = read_placements(&input)?;
            let language = lang.as_deref().unwrap_or(settings.language());
            let houses = derive_houses(&placements, language);
            if json {
                return print_json(&houses);
            }
            if houses.is_empty() {
                println!("No Ascendant with a known sign; houses unavailable");
            }
            print_houses(&houses);
        }

        Commands::Aspects {
            input,
            lang,
            allowed,
            exclude,
            orbs,
            sort,
        } => {
            let placements = read_placements(&input)?;
            let mut config = settings.aspect_config()?;
            if let Some(lang) = lang {
                config.language = lang;
            }
            if !allowed.is_empty() {
                config = config.allow(allowed);
            }
            config = config.exclude(exclude);
            config = apply_aspect_orbs(config, &orbs)?;

            let mut aspects = detect_aspects(&placements, &config);
            if sort {
                sort_by_tightness(&mut aspects);
            }
            if json {
                return print_json(&aspects);
            }
            print_aspects(&aspects);
        }

        Commands::Transits {
            natal,
            transit,
            orbs,
        } => {
            let natal = read_placements(&natal)?;
            let transiting = read_placements(&transit)?;
            let mut config = settings.transit_config()?;
            for &(kind, orb) in &orbs {
                config = config.with_orb(kind, orb)?;
            }
            let hits = detect_transit_aspects(&transiting, &natal, &config);
            if json {
                return print_json(&hits);
            }
            print_transits(&hits);
        }

        Commands::Chart { input, lang, top } => {
            let placements = read_placements(&input)?;
            let mut config = settings.aspect_config()?;
            if let Some(lang) = lang {
                config.language = lang;
            }
            let chart = NatalChart::compute(placements, &config);
            let tightest = chart.tightest_major_aspects(top);
            if json {
                return print_json(&ChartReport {
                    houses: &chart.houses,
                    aspects: &tightest,
                    themes: &chart.themes,
                });
            }
            print_houses(&chart.houses);
            println!();
            print_aspects(&tightest);
            println!();
            print_themes(&chart.themes);
        }

        Commands::Request {
            year,
            month,
            date,
            hours,
            minutes,
            seconds,
            latitude,
            longitude,
            timezone,
            lang,
        } => {
            let request = BirthRequest {
                year,
                month,
                date,
                hours,
                minutes,
                seconds,
                latitude,
                longitude,
                timezone,
                config: RequestConfig {
                    language: lang.unwrap_or_else(|| settings.language().to_string()),
                    ..RequestConfig::default()
                },
            };
            let body = request.to_json().context("building request body")?;
            println!("{body}");
        }
    }

    Ok(())
}

fn read_placements(path: &Path) -> Result<Vec<CelestialPlacement>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading ephemeris file {}", path.display()))?;
    let placements = placements_from_json(&content)
        .with_context(|| format!("parsing ephemeris file {}", path.display()))?;
    tracing::info!(
        file = %path.display(),
        bodies = placements.len(),
        "loaded placements"
    );
    Ok(placements)
}

fn apply_aspect_orbs(
    mut config: AspectConfig,
    orbs: &[(AspectKind, f64)],
) -> Result<AspectConfig> {
    for &(kind, orb) in orbs {
        config = config.with_orb(kind, orb)?;
    }
    Ok(config)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_houses(houses: &[HouseCusp]) {
    for h in houses {
        println!(
            "House {:>2}: {:<12} cusp {:>5.1} deg",
            h.house_number,
            h.sign.name(),
            h.start_longitude
        );
    }
}

fn print_aspects(aspects: &[AspectMatch]) {
    if aspects.is_empty() {
        println!("No aspects found");
    }
    for a in aspects {
        println!(
            "{:<12} {:<15} {:<12} sep {:>7.3}  off by {:.3}",
            a.body_a,
            a.aspect.name(),
            a.body_b,
            a.separation,
            a.separation_error
        );
    }
}

fn print_transits(hits: &[TransitAspect]) {
    if hits.is_empty() {
        println!("No transits in orb");
    }
    for t in hits {
        println!(
            "transit {:<10} {:<12} natal {:<12} off by {:.3}",
            t.transiting,
            t.aspect.name(),
            t.natal,
            t.separation_error
        );
    }
}

fn print_themes(themes: &ChartThemes) {
    let sign_or_dash = |s: Option<ZodiacSign>| s.map_or("-", ZodiacSign::name);
    println!(
        "Sun {} / Moon {} / Rising {}",
        sign_or_dash(themes.sun),
        sign_or_dash(themes.moon),
        sign_or_dash(themes.rising)
    );

    let elements: Vec<String> = ALL_ELEMENTS
        .iter()
        .map(|e| format!("{} {}", e.name(), themes.element_counts[e.index()]))
        .collect();
    println!("Elements: {}", elements.join(", "));
    let modalities: Vec<String> = ALL_MODALITIES
        .iter()
        .map(|m| format!("{} {}", m.name(), themes.modality_counts[m.index()]))
        .collect();
    println!("Modalities: {}", modalities.join(", "));

    if let Some(e) = themes.dominant_element {
        println!("Dominant element: {}", e.name());
    }
    if let Some(m) = themes.dominant_modality {
        println!("Dominant modality: {}", m.name());
    }
    if let Some(s) = themes.stellium {
        println!("Stellium in {s}");
    }
    if !themes.angular.is_empty() {
        println!("Angular: {}", themes.angular.join(", "));
    }
    if !themes.retrogrades.is_empty() {
        println!("Retrograde: {}", themes.retrogrades.join(", "));
    }
}
