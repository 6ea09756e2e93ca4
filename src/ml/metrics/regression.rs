//! 回帰モデル評価のためのメトリクス
//!
//! 対数誤差系（MSLE / RMSLE）は `ln(1 + y)` 変換を使うため、入力は
//! 非負かつ有限でなければなりません。

use crate::error::{Error, Result};

/// 複数出力の集約方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiOutput {
    /// 出力ごとのスコアをそのまま返す
    RawValues,
    /// 出力ごとのスコアの単純平均を返す
    UniformAverage,
}

/// 複数出力メトリクスの結果
#[derive(Debug, Clone, PartialEq)]
pub enum MultiOutputScore {
    Raw(Vec<f64>),
    Averaged(f64),
}

impl MultiOutputScore {
    /// 単一のスコアに集約する（`Raw` の場合は平均、空なら `None`）
    pub fn value(&self) -> Option<f64> {
        match self {
            MultiOutputScore::Raw(values) if values.is_empty() => None,
            MultiOutputScore::Raw(values) => {
                Some(values.iter().sum::<f64>() / values.len() as f64)
            }
            MultiOutputScore::Averaged(value) => Some(*value),
        }
    }
}

/// 真の値と予測値の長さと空チェック
fn check_consistent_length(y_true: &[f64], y_pred: &[f64]) -> Result<()> {
    if y_true.len() != y_pred.len() {
        return Err(Error::LengthMismatch {
            expected: y_true.len(),
            actual: y_pred.len(),
        });
    }

    if y_true.is_empty() {
        return Err(Error::EmptyData(
            "空のデータで計算することはできません".to_string(),
        ));
    }

    Ok(())
}

/// 有限値であることを確認
fn check_finite(name: &'static str, values: &[f64]) -> Result<()> {
    if let Some((index, value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(Error::InvalidValue(format!(
            "{}[{}] が有限値ではありません: {}",
            name, index, value
        )));
    }

    Ok(())
}

/// 対数変換できる値（非負）であることを確認
fn check_non_negative(name: &'static str, values: &[f64]) -> Result<()> {
    if let Some((index, &value)) = values.iter().enumerate().find(|&(_, &v)| v < 0.0) {
        return Err(Error::NegativeValue { name, index, value });
    }

    Ok(())
}

/// 両方の列について、先に有限性、次に符号を確認
fn check_log_domain(y_true: &[f64], y_pred: &[f64]) -> Result<()> {
    check_finite("y_true", y_true)?;
    check_finite("y_pred", y_pred)?;
    check_non_negative("y_true", y_true)?;
    check_non_negative("y_pred", y_pred)
}

fn check_sample_weight(sample_weight: &[f64], n_samples: usize) -> Result<f64> {
    if sample_weight.len() != n_samples {
        return Err(Error::LengthMismatch {
            expected: n_samples,
            actual: sample_weight.len(),
        });
    }

    if let Some((index, value)) = sample_weight
        .iter()
        .enumerate()
        .find(|&(_, &w)| !w.is_finite() || w < 0.0)
    {
        return Err(Error::InvalidValue(format!(
            "sample_weight[{}] は有限かつ非負である必要があります: {}",
            index, value
        )));
    }

    let total = sample_weight.iter().sum::<f64>();
    if total <= 0.0 {
        return Err(Error::InvalidInput(
            "sample_weight の合計が0です".to_string(),
        ));
    }

    Ok(total)
}

/// 対数誤差の二乗 `(ln(1 + t) - ln(1 + p))^2` の列
fn squared_log_errors<'a>(
    y_true: &'a [f64],
    y_pred: &'a [f64],
) -> impl Iterator<Item = f64> + 'a {
    y_true.iter().zip(y_pred.iter()).map(|(&t, &p)| {
        let error = t.ln_1p() - p.ln_1p();
        error * error
    })
}

/// 平均二乗対数誤差（Mean Squared Logarithmic Error）を計算
///
/// # Arguments
/// * `y_true` - 真の値（非負）
/// * `y_pred` - 予測値（非負）
///
/// # Returns
/// * `Result<f64>` - 平均二乗対数誤差
pub fn mean_squared_log_error(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
    check_consistent_length(y_true, y_pred)?;
    check_log_domain(y_true, y_pred)?;

    let sum = squared_log_errors(y_true, y_pred).sum::<f64>();
    Ok(sum / y_true.len() as f64)
}

/// 平均二乗対数誤差の平方根（Root Mean Squared Logarithmic Error）を計算
///
/// `sqrt(mean((ln(1 + y_true) - ln(1 + y_pred))^2))`。予測値が真の値と
/// 要素ごとに一致する場合は正確に `0.0` を返します。
///
/// # Arguments
/// * `y_true` - 真の値（非負）
/// * `y_pred` - 予測値（非負）
///
/// # Returns
/// * `Result<f64>` - RMSLE
pub fn root_mean_squared_log_error(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
    let msle = mean_squared_log_error(y_true, y_pred)?;
    log::trace!("rmsle over {} samples: msle={}", y_true.len(), msle);
    Ok(msle.sqrt())
}

/// [`root_mean_squared_log_error`] の短縮名
pub fn rmsle(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
    root_mean_squared_log_error(y_true, y_pred)
}

/// サンプル重み付きの平均二乗対数誤差を計算
pub fn weighted_mean_squared_log_error(
    y_true: &[f64],
    y_pred: &[f64],
    sample_weight: &[f64],
) -> Result<f64> {
    check_consistent_length(y_true, y_pred)?;
    check_log_domain(y_true, y_pred)?;
    let total_weight = check_sample_weight(sample_weight, y_true.len())?;

    let weighted_sum = squared_log_errors(y_true, y_pred)
        .zip(sample_weight.iter())
        .map(|(error, &w)| error * w)
        .sum::<f64>();

    Ok(weighted_sum / total_weight)
}

/// サンプル重み付きの RMSLE を計算
pub fn weighted_root_mean_squared_log_error(
    y_true: &[f64],
    y_pred: &[f64],
    sample_weight: &[f64],
) -> Result<f64> {
    Ok(weighted_mean_squared_log_error(y_true, y_pred, sample_weight)?.sqrt())
}

/// 行優先の2次元データから列を取り出す
fn columns(name: &'static str, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
    let n_outputs = rows.first().map(|r| r.len()).unwrap_or(0);
    if n_outputs == 0 {
        return Err(Error::EmptyData(format!("{} に出力がありません", name)));
    }

    if let Some(index) = rows.iter().position(|r| r.len() != n_outputs) {
        return Err(Error::DimensionMismatch(format!(
            "{} の {} 行目の出力数が {} です（期待値 {}）",
            name,
            index,
            rows[index].len(),
            n_outputs
        )));
    }

    Ok((0..n_outputs)
        .map(|j| rows.iter().map(|row| row[j]).collect())
        .collect())
}

/// 複数出力の RMSLE を計算
///
/// 出力（列）ごとに RMSLE を求めてから `multioutput` に従って集約します。
pub fn multioutput_root_mean_squared_log_error(
    y_true: &[Vec<f64>],
    y_pred: &[Vec<f64>],
    multioutput: MultiOutput,
) -> Result<MultiOutputScore> {
    if y_true.len() != y_pred.len() {
        return Err(Error::LengthMismatch {
            expected: y_true.len(),
            actual: y_pred.len(),
        });
    }
    if y_true.is_empty() {
        return Err(Error::EmptyData(
            "空のデータで計算することはできません".to_string(),
        ));
    }

    let true_columns = columns("y_true", y_true)?;
    let pred_columns = columns("y_pred", y_pred)?;
    if true_columns.len() != pred_columns.len() {
        return Err(Error::DimensionMismatch(format!(
            "出力数が一致しません: y_true {}, y_pred {}",
            true_columns.len(),
            pred_columns.len()
        )));
    }

    let per_output = true_columns
        .iter()
        .zip(pred_columns.iter())
        .map(|(t, p)| root_mean_squared_log_error(t, p))
        .collect::<Result<Vec<f64>>>()?;

    Ok(match multioutput {
        MultiOutput::RawValues => MultiOutputScore::Raw(per_output),
        MultiOutput::UniformAverage => {
            MultiOutputScore::Averaged(per_output.iter().sum::<f64>() / per_output.len() as f64)
        }
    })
}

/// 平均二乗誤差（Mean Squared Error）を計算
pub fn mean_squared_error(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
    check_consistent_length(y_true, y_pred)?;

    let sum_squared_error = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(&t, &p)| (t - p) * (t - p))
        .sum::<f64>();

    Ok(sum_squared_error / y_true.len() as f64)
}

/// 平均二乗誤差の平方根（Root Mean Squared Error）を計算
pub fn root_mean_squared_error(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
    Ok(mean_squared_error(y_true, y_pred)?.sqrt())
}

/// 平均絶対誤差（Mean Absolute Error）を計算
pub fn mean_absolute_error(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
    check_consistent_length(y_true, y_pred)?;

    let sum_absolute_error = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(&t, &p)| (t - p).abs())
        .sum::<f64>();

    Ok(sum_absolute_error / y_true.len() as f64)
}

/// 決定係数（R^2 score）を計算
///
/// # Returns
/// * `Result<f64>` - 決定係数（1が最高、悪化すると負の値になり得る）
pub fn r2_score(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
    check_consistent_length(y_true, y_pred)?;

    let y_mean = y_true.iter().sum::<f64>() / y_true.len() as f64;
    let ss_tot = y_true.iter().map(|&t| (t - y_mean).powi(2)).sum::<f64>();
    let ss_res = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(&t, &p)| (t - p).powi(2))
        .sum::<f64>();

    // 全てのy_trueが同じ値
    if ss_tot == 0.0 {
        if ss_res == 0.0 {
            Ok(1.0)
        } else {
            Ok(0.0)
        }
    } else {
        Ok(1.0 - ss_res / ss_tot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_identical_inputs_score_exactly_zero() {
        let y = [1.0, 2.0, 3.0];
        assert_eq!(root_mean_squared_log_error(&y, &y).unwrap(), 0.0);
        assert_eq!(mean_squared_log_error(&y, &y).unwrap(), 0.0);
    }

    #[test]
    fn test_zero_predictions_against_ones() {
        let score = rmsle(&[1.0, 1.0, 1.0], &[0.0, 0.0, 0.0]).unwrap();
        assert!((score - std::f64::consts::LN_2).abs() < EPS);
    }

    #[test]
    fn test_known_value() {
        // ln(4) - ln(2) = ln(2), ln(1) - ln(1) = 0
        let msle = mean_squared_log_error(&[3.0, 0.0], &[1.0, 0.0]).unwrap();
        let expected = std::f64::consts::LN_2.powi(2) / 2.0;
        assert!((msle - expected).abs() < EPS);
    }

    #[test]
    fn test_length_mismatch() {
        let result = rmsle(&[1.0, 2.0], &[1.0]);
        assert!(matches!(
            result,
            Err(Error::LengthMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_negative_true_value() {
        let result = rmsle(&[-1.0], &[1.0]);
        match result {
            Err(Error::NegativeValue { name, index, value }) => {
                assert_eq!(name, "y_true");
                assert_eq!(index, 0);
                assert_eq!(value, -1.0);
            }
            other => panic!("expected NegativeValue, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_predicted_value() {
        let result = rmsle(&[1.0, 2.0], &[1.0, -0.5]);
        assert!(matches!(
            result,
            Err(Error::NegativeValue {
                name: "y_pred",
                index: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_non_finite_checked_before_sign_in_either_slice() {
        assert!(matches!(
            rmsle(&[-1.0], &[f64::NAN]),
            Err(Error::InvalidValue(_))
        ));
        assert!(matches!(
            weighted_mean_squared_log_error(&[-1.0, 1.0], &[1.0, f64::INFINITY], &[1.0, 1.0]),
            Err(Error::InvalidValue(_))
        ));
        // 両方有限なら y_true の符号が先に確認される
        assert!(matches!(
            rmsle(&[-1.0], &[-2.0]),
            Err(Error::NegativeValue { name: "y_true", .. })
        ));
    }

    #[test]
    fn test_empty_raw_score_has_no_value() {
        assert_eq!(MultiOutputScore::Raw(vec![]).value(), None);
        assert_eq!(MultiOutputScore::Raw(vec![1.0, 3.0]).value(), Some(2.0));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(rmsle(&[], &[]), Err(Error::EmptyData(_))));
    }

    #[test]
    fn test_non_finite_input() {
        assert!(matches!(
            rmsle(&[f64::NAN], &[1.0]),
            Err(Error::InvalidValue(_))
        ));
        assert!(matches!(
            rmsle(&[1.0], &[f64::INFINITY]),
            Err(Error::InvalidValue(_))
        ));
    }

    #[test]
    fn test_uniform_weights_match_unweighted() {
        let y_true = [0.5, 3.0, 10.0, 7.0];
        let y_pred = [1.0, 2.0, 12.0, 0.0];
        let plain = root_mean_squared_log_error(&y_true, &y_pred).unwrap();
        let weighted =
            weighted_root_mean_squared_log_error(&y_true, &y_pred, &[2.0; 4]).unwrap();
        assert!((plain - weighted).abs() < EPS);
    }

    #[test]
    fn test_weights_select_samples() {
        // 重み0の要素は無視される
        let weighted =
            weighted_root_mean_squared_log_error(&[1.0, 1.0], &[0.0, 1.0], &[0.0, 1.0]).unwrap();
        assert_eq!(weighted, 0.0);
    }

    #[test]
    fn test_invalid_weights() {
        assert!(matches!(
            weighted_mean_squared_log_error(&[1.0], &[1.0], &[0.0]),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            weighted_mean_squared_log_error(&[1.0], &[1.0], &[-1.0]),
            Err(Error::InvalidValue(_))
        ));
        assert!(matches!(
            weighted_mean_squared_log_error(&[1.0], &[1.0], &[1.0, 1.0]),
            Err(Error::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_multioutput_raw_and_average() {
        let y_true = vec![vec![1.0, 0.0], vec![1.0, 3.0]];
        let y_pred = vec![vec![0.0, 0.0], vec![0.0, 3.0]];

        let raw = multioutput_root_mean_squared_log_error(&y_true, &y_pred, MultiOutput::RawValues)
            .unwrap();
        let values = match &raw {
            MultiOutputScore::Raw(values) => values.clone(),
            other => panic!("expected raw values, got {:?}", other),
        };
        assert_eq!(values.len(), 2);
        assert!((values[0] - std::f64::consts::LN_2).abs() < EPS);
        assert_eq!(values[1], 0.0);

        let averaged =
            multioutput_root_mean_squared_log_error(&y_true, &y_pred, MultiOutput::UniformAverage)
                .unwrap();
        let averaged = averaged.value().unwrap();
        assert!((averaged - std::f64::consts::LN_2 / 2.0).abs() < EPS);
        assert!((raw.value().unwrap() - averaged).abs() < EPS);
    }

    #[test]
    fn test_multioutput_ragged_rows() {
        let y_true = vec![vec![1.0, 2.0], vec![1.0]];
        let y_pred = vec![vec![1.0, 2.0], vec![1.0, 2.0]];
        assert!(matches!(
            multioutput_root_mean_squared_log_error(&y_true, &y_pred, MultiOutput::RawValues),
            Err(Error::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_multioutput_output_count_mismatch() {
        let y_true = vec![vec![1.0, 2.0]];
        let y_pred = vec![vec![1.0]];
        assert!(matches!(
            multioutput_root_mean_squared_log_error(&y_true, &y_pred, MultiOutput::UniformAverage),
            Err(Error::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_squared_error_family() {
        let y_true = [3.0, -0.5, 2.0, 7.0];
        let y_pred = [2.5, 0.0, 2.0, 8.0];
        assert!((mean_squared_error(&y_true, &y_pred).unwrap() - 0.375).abs() < EPS);
        assert!((root_mean_squared_error(&y_true, &y_pred).unwrap() - 0.375f64.sqrt()).abs() < EPS);
        assert!((mean_absolute_error(&y_true, &y_pred).unwrap() - 0.5).abs() < EPS);
    }

    #[test]
    fn test_r2_score() {
        let y_true = [3.0, -0.5, 2.0, 7.0];
        let y_pred = [2.5, 0.0, 2.0, 8.0];
        let r2 = r2_score(&y_true, &y_pred).unwrap();
        assert!((r2 - 0.948_608_137_044_967_9).abs() < 1e-9);

        assert_eq!(r2_score(&[2.0, 2.0], &[2.0, 2.0]).unwrap(), 1.0);
        assert_eq!(r2_score(&[2.0, 2.0], &[1.0, 3.0]).unwrap(), 0.0);
    }
}
