use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ridgerun", about = "Rhythm-platformer level generator: MP3 in, obstacle features and terrain out")]
pub struct Cli {
    /// Input MP3 file
    pub input: Option<PathBuf>,

    /// Output level JSON file
    #[arg(short, long, default_value = "level.json")]
    pub output: PathBuf,

    /// Also write the height map as JSON to this path
    #[arg(long)]
    pub heightmap: Option<PathBuf>,

    /// FFT window size in samples
    #[arg(long, default_value_t = 1024)]
    pub window_size: usize,

    /// Terrain height ceiling in world units
    #[arg(long, default_value_t = 8.0)]
    pub max_height: f32,

    /// Moving-median window (odd) for band series smoothing
    #[arg(long, default_value_t = 5)]
    pub feature_smoothing: usize,

    /// Moving-mean window (odd) for height-map smoothing
    #[arg(long, default_value_t = 11)]
    pub height_smoothing: usize,

    /// Skip reading and writing the level cache
    #[arg(long)]
    pub no_cache: bool,

    /// Level cache directory (default: platform cache dir)
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Config file path (default: auto-detect ridgerun.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
