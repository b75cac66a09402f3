use clap::Parser;
use particle_trail::pipeline::Hsv;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Track a colored particle and draw its recent trajectory", long_about = None)]
pub struct Args {
    /// Path to a recorded video; the camera is used when omitted
    #[arg(short, long)]
    pub video: Option<PathBuf>,

    /// Maximum number of trail points kept
    #[arg(short, long, default_value_t = 64, value_parser = clap::value_parser!(u32).range(1..))]
    pub buffer: u32,

    /// Camera index used when no video is given
    #[arg(long, default_value_t = 0)]
    pub camera: i32,

    /// Lower HSV bound as H,S,V (hue 0-179)
    #[arg(long, default_value = "100,50,50", value_parser = parse_hsv)]
    pub lower: Hsv,

    /// Upper HSV bound as H,S,V (hue 0-179)
    #[arg(long, default_value = "140,255,255", value_parser = parse_hsv)]
    pub upper: Hsv,

    /// Frame width after resizing
    #[arg(long, default_value_t = 600)]
    pub width: u32,

    /// Detections with an enclosing radius at or below this are not drawn
    #[arg(long, default_value_t = 10.0)]
    pub min_radius: f64,

    /// Pause after opening the source, in milliseconds
    #[arg(long, default_value_t = 2000)]
    pub warmup_ms: u64,
}

fn parse_hsv(text: &str) -> Result<Hsv, String> {
    let channels: Vec<&str> = text.split(',').map(str::trim).collect();
    let &[hue, saturation, value] = channels.as_slice() else {
        return Err(format!("expected H,S,V, got `{text}`"));
    };
    let parse = |name: &str, channel: &str| {
        channel
            .parse::<u8>()
            .map_err(|e| format!("invalid {name} `{channel}`: {e}"))
    };
    let hue = parse("hue", hue)?;
    if hue >= 180 {
        return Err(format!("hue must be below 180, got {hue}"));
    }
    Ok(Hsv::new(hue, parse("saturation", saturation)?, parse("value", value)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hsv_triples() {
        assert_eq!(parse_hsv("100,50,50"), Ok(Hsv::new(100, 50, 50)));
        assert_eq!(parse_hsv(" 10, 20 ,30"), Ok(Hsv::new(10, 20, 30)));
    }

    #[test]
    fn rejects_malformed_hsv() {
        assert!(parse_hsv("100,50").is_err());
        assert!(parse_hsv("100,50,50,1").is_err());
        assert!(parse_hsv("100,50,300").is_err());
        assert!(parse_hsv("180,50,50").is_err());
    }

    #[test]
    fn defaults_match_the_blue_tracker() {
        let args = Args::parse_from(["trail_viewer"]);
        assert!(args.video.is_none());
        assert_eq!(args.buffer, 64);
        assert_eq!(args.lower, Hsv::new(100, 50, 50));
        assert_eq!(args.upper, Hsv::new(140, 255, 255));
    }

    #[test]
    fn zero_buffer_is_rejected() {
        assert!(Args::try_parse_from(["trail_viewer", "--buffer", "0"]).is_err());
    }
}
