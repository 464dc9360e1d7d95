use {
    clap::{Parser, Subcommand},
    color::{
        batch::{self, Event, Job, Runner},
        Color, ColorCluster, Grid, Options, Search, Swatch, DEFAULT_COLORS,
    },
    std::{
        env,
        ffi::OsStr,
        fmt::Write as _,
        fs::{self, File},
        io::{self, BufWriter},
        path::{Path, PathBuf},
        process::ExitCode,
    },
    thiserror::Error,
    tracing::warn,
    tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter},
};

#[derive(Parser)]
#[command(name = "swatch")]
#[command(about = "Repaint images with a palette and extract their dominant colors")]
struct Cli {
    /// Print debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Repaint an image or a directory of images with palette colors
    Repaint {
        /// An image or a directory of images
        input: PathBuf,

        /// Comma separated hex colors (e.g. "#f00, #00ff00")
        #[arg(short, long)]
        colors: Option<String>,

        /// Add the preset palette of basic colors
        #[arg(long)]
        preset: bool,

        /// Specify output directory (current by default)
        #[arg(short, long)]
        outdir: Option<PathBuf>,
    },
    /// Extract dominant colors of an image
    Extract {
        /// Image to extract colors from
        image: PathBuf,

        /// Number of colors to extract
        #[arg(short = 'k', long, default_value_t = DEFAULT_COLORS)]
        colors: usize,

        /// Number of swatches in a grid row
        #[arg(long, default_value_t = Grid::<ColorCluster>::DEFAULT_COLUMNS)]
        columns: usize,

        /// Show only colors whose hex value contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Describe the shown color with this index
        #[arg(long)]
        select: Option<usize>,

        /// Save shown colors to a .json file with this name
        #[arg(long)]
        json: Option<String>,

        /// Specify output directory (current by default)
        #[arg(short, long)]
        outdir: Option<PathBuf>,
    },
    /// Describe hex colors
    Describe {
        /// Comma separated hex colors
        colors: String,
    },
    /// Turn an image into a mosaic of square blocks
    Pixelate {
        /// Image to pixelate
        image: PathBuf,

        /// Block size in pixels
        #[arg(short, long, default_value_t = 16)]
        block: u32,

        /// Specify output directory (current by default)
        #[arg(short, long)]
        outdir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if let Err(err) = run(cli.command) {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "swatch=debug,color=debug"
    } else {
        "swatch=info,color=info"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(io::stderr),
        )
        .init();
}

fn run(command: Command) -> Result<(), Error> {
    match command {
        Command::Repaint {
            input,
            colors,
            preset,
            outdir,
        } => {
            let mut palette = read_colors(colors.as_deref().unwrap_or_default());
            if preset {
                palette.extend(color::PRESET);
            }

            // created by the batch once the palette is checked
            let outdir = resolve_outdir(outdir)?;
            repaint(Job {
                input,
                outdir,
                palette,
            })
        }
        Command::Extract {
            image,
            colors,
            columns,
            search,
            select,
            json,
            outdir,
        } => {
            let options = Options {
                colors,
                ..Options::default()
            };

            let clusters = color::extract_file(&image, &options);
            if clusters.is_empty() {
                return Err(Error::NoColors(image));
            }

            println!("found {} dominant colors", clusters.len());
            let mut grid = Grid::new(clusters, columns);
            if let Some(query) = search {
                match grid.search(&query) {
                    Search::Matched(n) => println!("{n} colors match {query:?}"),
                    Search::NoMatches => println!("no colors match {query:?}"),
                    Search::EmptyQuery => println!("the search query is empty"),
                }
            }

            print_grid(&grid);
            if let Some(index) = select {
                let cluster = grid.select(index).ok_or(Error::NoSuchColor(index))?;
                print_description(cluster.color);
                println!("  pixels: {}", cluster.count);
            }

            if let Some(name) = json {
                let colors: Vec<_> = grid.displayed().map(Swatch::color).collect();
                let outdir = make_outdir(outdir)?;
                serialize_colors(&colors, &name, &outdir)?;
            }

            Ok(())
        }
        Command::Describe { colors } => {
            let colors = read_colors(&colors);
            if colors.is_empty() {
                return Err(Error::NoValidColors);
            }

            for col in colors {
                print_description(col);
            }

            Ok(())
        }
        Command::Pixelate {
            image,
            block,
            outdir,
        } => {
            let im = im::decode(&image)?;
            let pixelated = im::pixelate(&im, block)?;
            let name = image
                .file_name()
                .and_then(OsStr::to_str)
                .ok_or_else(|| Error::FileName(image.clone()))?;

            let outdir = make_outdir(outdir)?;
            let path = outdir.join(format!("pixelated_{name}"));
            println!("write image to file {path:?}");
            im::encode(&pixelated, &path)?;
            Ok(())
        }
    }
}

fn read_colors(input: &str) -> Vec<Color> {
    let parsed = color::parse(input);
    for err in &parsed.rejected {
        warn!("skip color: {err}");
    }

    parsed.colors
}

fn repaint(job: Job) -> Result<(), Error> {
    let mut runner = Runner::new();
    let handle = runner.start(job)?;
    let cancel = handle.cancel_token();
    let handler = ctrlc::set_handler(move || {
        if !cancel.is_cancelled() {
            eprintln!("cancelling after the current image");
            cancel.cancel();
        }
    });

    if let Err(err) = handler {
        warn!("failed to set the interrupt handler: {err}");
    }

    for event in handle.events() {
        match event {
            Event::Processed { file, output } => println!("{file}: written to {output:?}"),
            Event::Failed { file, error } => eprintln!("{file}: {error}"),
            Event::Progress(percent) => println!("progress {percent}%"),
            Event::Finished(report) => {
                let status = if report.cancelled { "cancelled" } else { "done" };
                println!(
                    "{status}: {} of {} images repainted, {} failed",
                    report.processed.len(),
                    report.total,
                    report.failed.len(),
                );
            }
        }
    }

    if let Some(res) = runner.finish() {
        res?;
    }

    Ok(())
}

fn print_grid<T>(grid: &Grid<T>)
where
    T: Swatch,
{
    for row in grid.rows() {
        let mut line = String::new();
        for item in row {
            let col = item.color();
            let [r, g, b] = col.rgb();
            let fg = if col.is_light() { "0;0;0" } else { "255;255;255" };
            _ = write!(line, "\x1b[48;2;{r};{g};{b}m\x1b[38;2;{fg}m {col} \x1b[0m");
        }

        println!("{line}");
    }
}

fn print_description(col: Color) {
    let desc = color::describe(col);
    let [r, g, b] = col.rgb();
    println!("{col}  rgb({r}, {g}, {b})  {}", desc.hsv);
    println!("  name: {}", desc.name());
    println!("  {desc}");
}

fn resolve_outdir(outdir: Option<PathBuf>) -> Result<PathBuf, Error> {
    outdir
        .or_else(|| env::current_dir().ok())
        .ok_or(Error::OutDir)
}

fn make_outdir(outdir: Option<PathBuf>) -> Result<PathBuf, Error> {
    let outdir = resolve_outdir(outdir)?;
    if !outdir.exists() {
        fs::create_dir_all(&outdir).map_err(|_| Error::OutDir)?;
    }

    Ok(outdir)
}

fn serialize_colors(colors: &[Color], name: &str, outdir: &Path) -> Result<(), Error> {
    let mut path = outdir.join(name);
    path.set_extension("json");
    println!("write colors ({}) to file {path:?}", colors.len());
    let file = {
        let file = File::create(&path).map_err(|_| Error::CreateFile(path))?;
        BufWriter::new(file)
    };

    serde_json::to_writer(file, colors)?;
    Ok(())
}

#[derive(Debug, Error)]
enum Error {
    #[error("failed to get output directory")]
    OutDir,

    #[error("failed to create the file {0:?}")]
    CreateFile(PathBuf),

    #[error("no file name in {0:?}")]
    FileName(PathBuf),

    #[error("no colors extracted from {0:?}")]
    NoColors(PathBuf),

    #[error("no color at index {0}")]
    NoSuchColor(usize),

    #[error("no valid colors given")]
    NoValidColors,

    #[error(transparent)]
    Batch(#[from] batch::Error),

    #[error(transparent)]
    Image(#[from] im::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_extract() {
        let cli = Cli::parse_from(["swatch", "extract", "img.png", "-k", "5", "--search", "ff"]);
        match cli.command {
            Command::Extract {
                colors,
                columns,
                search,
                ..
            } => {
                assert_eq!(colors, 5);
                assert_eq!(columns, 10);
                assert_eq!(search.as_deref(), Some("ff"));
            }
            _ => panic!("expected extract"),
        }
    }

    #[test]
    fn read_partial_colors() {
        assert_eq!(read_colors("#f00, nope, 0f0").len(), 2);
    }

    #[test]
    fn repaint_without_valid_colors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let outdir = dir.path().join("out");
        let res = run(Command::Repaint {
            input: dir.path().to_owned(),
            colors: Some("nope, #12".to_owned()),
            preset: false,
            outdir: Some(outdir.clone()),
        });

        assert!(matches!(res, Err(Error::Batch(batch::Error::NoValidColors))));
        assert!(!outdir.exists());
    }
}
