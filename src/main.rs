use clap::Parser;
use log::info;
use std::path::PathBuf;
use zlib_lib::{decompress_file, Framing};

#[derive(Parser, Debug)]
#[command(version, about = "Decompress a zlib file into <FILE_NAME>.bin")]
struct Args {
    /// File name to decompress
    file_name: PathBuf,

    /// Envelope around the deflate data: zlib, gzip, raw or auto (zlib or gzip)
    #[arg(short, long, default_value_t = Framing::Zlib)]
    framing: Framing,

    /// Dump the parsed header before decompressing
    #[arg(short, long, default_value_t = false)]
    info: bool,

    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    if args.debug {
        std::env::set_var("RUST_LOG", "debug");
    }
    pretty_env_logger::try_init()?;

    let output = decompress_file(&args.file_name, args.framing, args.info)?;
    info!("decompressed {} into {}", args.file_name.display(), output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_missing_file_name() {
        let err = Args::try_parse_from(["unzlib"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["unzlib", "greeting.dat"]).unwrap();
        assert_eq!(args.file_name, PathBuf::from("greeting.dat"));
        assert_eq!(args.framing, Framing::Zlib);
        assert!(!args.info);
        assert!(!args.debug);
    }

    #[test]
    fn test_framing_flag() {
        let args = Args::try_parse_from(["unzlib", "-f", "auto", "data.gz"]).unwrap();
        assert_eq!(args.framing, Framing::Auto);
        let args = Args::try_parse_from(["unzlib", "--framing", "raw", "data.deflate"]).unwrap();
        assert_eq!(args.framing, Framing::Raw);
    }

    #[test]
    fn test_unknown_framing() {
        let err = Args::try_parse_from(["unzlib", "-f", "brotli", "data"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_extra_positional() {
        assert!(Args::try_parse_from(["unzlib", "a.dat", "b.dat"]).is_err());
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
