use crate::error::{FoodDetectError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// エンドポイントURL（優先）
pub const INVOKE_URL_VAR: &str = "FOOD_DETECT_INVOKE_URL";
/// エンドポイントURL（フォールバック）
pub const API_URL_VAR: &str = "FOOD_DETECT_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub endpoint: Option<String>,
}

/// エンドポイントURLの取得元
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointSource {
    Flag,
    InvokeUrlEnv,
    ApiUrlEnv,
    ConfigFile,
}

impl std::fmt::Display for EndpointSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EndpointSource::Flag => write!(f, "--endpoint"),
            EndpointSource::InvokeUrlEnv => write!(f, "{}", INVOKE_URL_VAR),
            EndpointSource::ApiUrlEnv => write!(f, "{}", API_URL_VAR),
            EndpointSource::ConfigFile => write!(f, "config file"),
        }
    }
}

/// 解決済みのエンドポイント
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub url: String,
    pub source: EndpointSource,
}

impl Config {
    /// 既定の場所から読み込む（ファイルがなければ空の設定）
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// `~/.config/food-detect/config.json`
    pub fn config_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(".config").join("food-detect").join("config.json"))
            .ok_or_else(|| FoodDetectError::Config("ホームディレクトリが見つかりません".into()))
    }

    pub fn set_endpoint(&mut self, url: String) -> Result<()> {
        self.endpoint = Some(url);
        self.save()
    }

    /// 環境変数を参照してエンドポイントを解決
    pub fn resolve_endpoint(&self, flag: Option<&str>) -> Option<Endpoint> {
        self.resolve_endpoint_with(flag, |name| std::env::var(name).ok())
    }

    /// 優先順: フラグ → FOOD_DETECT_INVOKE_URL → FOOD_DETECT_API_URL → 設定ファイル
    ///
    /// 空文字列は未設定として扱う。
    pub fn resolve_endpoint_with<F>(&self, flag: Option<&str>, lookup: F) -> Option<Endpoint>
    where
        F: Fn(&str) -> Option<String>,
    {
        let candidates = [
            (flag.map(str::to_string), EndpointSource::Flag),
            (lookup(INVOKE_URL_VAR), EndpointSource::InvokeUrlEnv),
            (lookup(API_URL_VAR), EndpointSource::ApiUrlEnv),
            (self.endpoint.clone(), EndpointSource::ConfigFile),
        ];

        candidates.into_iter().find_map(|(value, source)| {
            value
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty())
                .map(|url| Endpoint { url, source })
        })
    }
}
