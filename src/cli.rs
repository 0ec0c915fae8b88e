use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "food-detect")]
#[command(about = "中央アジア料理の画像認識クライアント", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 料理写真を送信して検出結果を表示
    Detect {
        /// 画像ファイルのパス
        #[arg(required = true)]
        image: PathBuf,

        /// 宣言MIMEタイプ（省略時は拡張子から推定）
        #[arg(long)]
        mime: Option<String>,

        /// エンドポイントURL（環境変数・設定ファイルより優先）
        #[arg(short, long)]
        endpoint: Option<String>,

        /// 検出枠付き画像の保存先
        #[arg(short, long)]
        save_image: Option<PathBuf>,

        /// 正規化済みレスポンスをJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 設定を表示/編集
    Config {
        /// エンドポイントURLを保存
        #[arg(long)]
        set_endpoint: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_detect() {
        let cli = Cli::try_parse_from([
            "food-detect",
            "detect",
            "plov.jpg",
            "--endpoint",
            "http://localhost:8080",
            "--json",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Detect { image, endpoint, json, mime, save_image } => {
                assert_eq!(image, PathBuf::from("plov.jpg"));
                assert_eq!(endpoint.as_deref(), Some("http://localhost:8080"));
                assert!(json);
                assert!(mime.is_none());
                assert!(save_image.is_none());
            }
            _ => panic!("expected detect"),
        }
    }

    #[test]
    fn test_detect_requires_image() {
        assert!(Cli::try_parse_from(["food-detect", "detect"]).is_err());
    }

    #[test]
    fn test_parse_config() {
        let cli = Cli::try_parse_from(["food-detect", "config", "--show"]).unwrap();
        assert!(matches!(cli.command, Commands::Config { show: true, set_endpoint: None }));
    }
}
