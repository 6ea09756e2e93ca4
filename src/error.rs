use thiserror::Error;

/// エラー型の定義
#[derive(Error, Debug)]
pub enum Error {
    #[error("長さが一致しません: 期待値 {expected}, 実際 {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("次元不一致エラー: {0}")]
    DimensionMismatch(String),

    #[error("データがありません: {0}")]
    EmptyData(String),

    #[error("負の値は対数誤差に使用できません: {name}[{index}] = {value}")]
    NegativeValue {
        name: &'static str,
        index: usize,
        value: f64,
    },

    #[error("無効な値です: {0}")]
    InvalidValue(String),

    #[error("無効な入力です: {0}")]
    InvalidInput(String),

    #[error("無効な操作です: {0}")]
    InvalidOperation(String),

    #[error("キーが見つかりません: {0}")]
    KeyNotFound(String),

    #[error("型変換エラー: {0}")]
    Cast(String),

    #[error("データ形式エラー: {0}")]
    Format(String),

    #[error("入出力エラー")]
    Io(#[source] std::io::Error),

    #[error("JSONエラー")]
    Json(#[source] serde_json::Error),
}

/// Resultの型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Format(format!("TOML: {}", err))
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Format(format!("TOML: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Format(format!("YAML: {}", err))
    }
}
