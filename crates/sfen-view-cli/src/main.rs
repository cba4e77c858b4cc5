//! SFEN 局面図ビューア
//!
//! # 使用例
//!
//! ```bash
//! # テキスト中の SFEN を SVG にする
//! echo "startpos: lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1" \
//!     | sfen-view render > board.svg
//!
//! # PNG を Markdown 画像として埋め込む形で出力
//! sfen-view render --format png --embed markdown --theme dark "$TEXT"
//!
//! # 局面を JSON で確認
//! sfen-view decode "8l/1l+R2P3/p2pBG1pp/kps1p4/Nn1P2G2/P1P1P2PP/1PS6/1KSG3+r1/LN2N3L w Sbgn3p 124"
//! ```
//!
//! SFEN が見つからない・壊れている場合は何も出力せず終了コード 2 で終わる。

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use sfen_view_core::{LocateError, decode, locate, sfen_run_at};
use sfen_view_render::{
    OutputFormat, Preview, PreviewConfig, PreviewError, Previewer, TextColorMode, ThemeKind,
};

/// プレビューを出さないだけの失敗
const EXIT_NO_PREVIEW: i32 = 2;

#[derive(Parser, Debug)]
#[command(name = "sfen-view", version, about = "テキスト中の SFEN を局面図にする")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// SFEN を含むテキストを画像にする
    Render {
        /// 入力テキスト（省略時は標準入力）
        text: Option<String>,
        /// カーソル位置（バイト）。その位置の「単語」だけを対象にする
        #[arg(long)]
        offset: Option<usize>,
        /// テキストの出どころの文書パス（file-selector の判定に使う）
        #[arg(long)]
        file: Option<PathBuf>,
        /// 設定ファイル（TOML）
        #[arg(long)]
        config: Option<PathBuf>,
        /// 出力形式
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
        /// 文字色
        #[arg(long, value_enum)]
        text_color: Option<TextColorArg>,
        /// エディタの配色テーマ
        #[arg(long, value_enum, default_value_t = ThemeArg::Light)]
        theme: ThemeArg,
        /// 盤上の駒の文字サイズ
        #[arg(long)]
        font_size: Option<f64>,
        /// PNG の駒文字に使うフォントファイル
        #[arg(long)]
        font_file: Option<PathBuf>,
        /// 出力の包み方
        #[arg(long, value_enum, default_value_t = Embed::Raw)]
        embed: Embed,
        /// 出力先（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// SFEN を局面の JSON にする
    Decode {
        /// 入力テキスト（省略時は標準入力）
        text: Option<String>,
        /// JSON の代わりに正規化した SFEN だけを出力
        #[arg(long)]
        sfen: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Svg,
    Png,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum TextColorArg {
    /// テーマに従う
    Default,
    #[value(alias = "light")]
    Black,
    #[value(alias = "dark")]
    White,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
    HighContrast,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Embed {
    /// 画像のバイト列そのまま
    Raw,
    /// data URI
    DataUri,
    /// Markdown の画像記法
    Markdown,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Svg => OutputFormat::Svg,
            FormatArg::Png => OutputFormat::Png,
        }
    }
}

impl From<TextColorArg> for TextColorMode {
    fn from(arg: TextColorArg) -> Self {
        match arg {
            TextColorArg::Default => TextColorMode::Default,
            TextColorArg::Black => TextColorMode::Black,
            TextColorArg::White => TextColorMode::White,
        }
    }
}

impl From<ThemeArg> for ThemeKind {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => ThemeKind::Light,
            ThemeArg::Dark => ThemeKind::Dark,
            ThemeArg::HighContrast => ThemeKind::HighContrast,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.debug);

    if let Err(e) = run(cli.cmd) {
        if e.downcast_ref::<PreviewError>().is_some_and(PreviewError::is_silent) {
            log::info!("No preview: {e:#}");
            std::process::exit(EXIT_NO_PREVIEW);
        }
        log::error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

fn init_logger(debug: bool) {
    let log_level = if debug { "debug" } else { "info" };
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, log_level),
    );
    builder
        .format(|buf, record| {
            writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args())
        })
        .write_style(env_logger::WriteStyle::Never)
        .target(env_logger::Target::Stderr)
        .init();
}

fn run(cmd: Cmd) -> Result<()> {
    match cmd {
        Cmd::Render {
            text,
            offset,
            file,
            config,
            format,
            text_color,
            theme,
            font_size,
            font_file,
            embed,
            output,
        } => {
            let mut config = match config {
                Some(path) => PreviewConfig::load(&path)
                    .with_context(|| format!("load config: {}", path.display()))?,
                None => PreviewConfig::default(),
            };
            if let Some(format) = format {
                config.format = format.into();
            }
            if let Some(color) = text_color {
                config.text_color = color.into();
            }
            if let Some(size) = font_size {
                config.font_size = size;
            }
            if let Some(path) = font_file {
                config.font_file = Some(path);
            }
            config.validate().context("invalid options")?;

            let input = read_input(text)?;
            let text = match offset {
                Some(offset) => sfen_run_at(&input, offset)
                    .ok_or(PreviewError::NotFound(LocateError::NotFound))?,
                None => input.as_str(),
            };
            run_render(config, file.as_deref(), text, theme.into(), embed, output.as_deref())
        }
        Cmd::Decode { text, sfen } => run_decode(&read_input(text)?, sfen),
    }
}

fn run_render(
    config: PreviewConfig,
    file: Option<&Path>,
    text: &str,
    theme: ThemeKind,
    embed: Embed,
    output: Option<&Path>,
) -> Result<()> {
    let previewer = Previewer::new(config).context("prepare renderer")?;
    let preview = match file {
        Some(file) => previewer.render_for(file, text, theme)?,
        None => previewer.render(text, theme)?,
    };
    let bytes = embedded(&preview, embed);

    match output {
        Some(path) => {
            std::fs::write(path, &bytes)
                .with_context(|| format!("write image: {}", path.display()))?;
            log::info!("Wrote {} ({} bytes) to {}", preview.mime_type, bytes.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes).context("write to stdout")?;
            stdout.flush().context("flush stdout")?;
        }
    }
    Ok(())
}

fn embedded(preview: &Preview, embed: Embed) -> Vec<u8> {
    match embed {
        Embed::Raw => preview.bytes.clone(),
        Embed::DataUri => format!("{}\n", preview.to_data_uri()).into_bytes(),
        Embed::Markdown => format!("{}\n", preview.to_markdown()).into_bytes(),
    }
}

fn run_decode(text: &str, sfen_only: bool) -> Result<()> {
    let found = locate(text).map_err(PreviewError::from)?;
    let position = decode(&found).map_err(PreviewError::from)?;
    if sfen_only {
        println!("{}", position.to_sfen());
    } else {
        let json =
            serde_json::to_string_pretty(&position.to_json()).context("serialize position")?;
        println!("{json}");
    }
    Ok(())
}

fn read_input(text: Option<String>) -> Result<String> {
    match text {
        Some(text) => Ok(text),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).context("read stdin")?;
            Ok(buf)
        }
    }
}
