//! 機械学習の評価指標モジュール
//!
//! 回帰モデルの評価に使用する指標を提供します。

pub mod regression;

use crate::error::{Error, Result};
use num_traits::ToPrimitive;

/// 任意の数値型のスライスを `f64` の列に変換する
///
/// カウントデータ（整数）をそのままメトリクスに渡すために使います。
/// 組み込みの数値型は常に変換できます。`to_f64` が `None` を返す独自の
/// `ToPrimitive` 実装の値は [`Error::Cast`] になります。
pub fn to_f64_values<T: ToPrimitive>(values: &[T]) -> Result<Vec<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            value
                .to_f64()
                .ok_or_else(|| Error::Cast(format!("{} 番目の値を f64 に変換できません", index)))
        })
        .collect()
}
