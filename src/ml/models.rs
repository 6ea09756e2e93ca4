//! 機械学習モデルモジュール
//!
//! スコアラーを呼び出す評価ハーネス（交差検証）と、ベースラインとなる
//! ダミー回帰モデルを提供します。

use crate::error::{Error, Result};
use crate::ml::scorer::Estimator;

/// 教師あり学習モデルに共通するトレイト
///
/// 特徴量は行優先（1サンプル = 1行）で渡します。
pub trait SupervisedModel: Estimator<[Vec<f64>]> {
    /// モデルを訓練データでフィットさせる
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()>;
}

/// ダミー回帰モデルの予測戦略
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DummyStrategy {
    /// 訓練データの目的変数の平均
    Mean,
    /// 訓練データの目的変数の中央値
    Median,
    /// 固定値
    Constant(f64),
}

/// 特徴量を無視して一定の値を予測する回帰モデル
#[derive(Debug, Clone)]
pub struct DummyRegressor {
    strategy: DummyStrategy,
    /// 学習済みの予測値
    value: Option<f64>,
}

impl DummyRegressor {
    /// 新しいダミー回帰モデルを作成
    pub fn new(strategy: DummyStrategy) -> Self {
        DummyRegressor {
            strategy,
            value: None,
        }
    }

    /// 常に `value` を予測するモデルを作成
    pub fn constant(value: f64) -> Self {
        Self::new(DummyStrategy::Constant(value))
    }

    pub fn strategy(&self) -> DummyStrategy {
        self.strategy
    }

    /// 学習済みの予測値（未学習なら `None`）
    pub fn fitted_value(&self) -> Option<f64> {
        self.value
    }
}

impl Default for DummyRegressor {
    fn default() -> Self {
        Self::new(DummyStrategy::Mean)
    }
}

impl Estimator<[Vec<f64>]> for DummyRegressor {
    fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>> {
        match self.value {
            Some(value) => Ok(vec![value; x.len()]),
            None => Err(Error::InvalidOperation(
                "モデルはまだ学習されていません".to_string(),
            )),
        }
    }
}

impl SupervisedModel for DummyRegressor {
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()> {
        if x.len() != y.len() {
            return Err(Error::LengthMismatch {
                expected: x.len(),
                actual: y.len(),
            });
        }

        if y.is_empty() {
            return Err(Error::EmptyData(
                "空のデータで学習することはできません".to_string(),
            ));
        }

        if y.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidValue(
                "目的変数に有限でない値が含まれています".to_string(),
            ));
        }

        let value = match self.strategy {
            DummyStrategy::Mean => y.iter().sum::<f64>() / y.len() as f64,
            DummyStrategy::Median => {
                let mut sorted = y.to_vec();
                sorted.sort_by(|a, b| a.total_cmp(b));
                let mid = sorted.len() / 2;
                if sorted.len() % 2 == 0 {
                    (sorted[mid - 1] + sorted[mid]) / 2.0
                } else {
                    sorted[mid]
                }
            }
            DummyStrategy::Constant(value) => value,
        };

        self.value = Some(value);
        Ok(())
    }
}

/// モデル選択と評価のためのユーティリティ
pub mod model_selection {
    use super::*;
    use crate::ml::scorer::Scorer;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    /// 交差検証のための (訓練インデックス, テストインデックス) を生成
    ///
    /// `random_seed` が指定された場合はシャッフルしてから分割します。
    /// 最後のフォールドは余りのサンプルを含みます。
    pub fn k_fold_split(
        n_samples: usize,
        k: usize,
        random_seed: Option<u64>,
    ) -> Result<Vec<(Vec<usize>, Vec<usize>)>> {
        if k < 2 {
            return Err(Error::InvalidInput(format!(
                "分割数は2以上である必要があります: {}",
                k
            )));
        }

        if k > n_samples {
            return Err(Error::InvalidInput(format!(
                "分割数 {} がサンプル数 {} を超えています",
                k, n_samples
            )));
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        if let Some(seed) = random_seed {
            let mut rng = StdRng::seed_from_u64(seed);
            indices.shuffle(&mut rng);
        }

        let fold_size = n_samples / k;
        let mut folds = Vec::with_capacity(k);

        for i in 0..k {
            let start = i * fold_size;
            let end = if i == k - 1 { n_samples } else { (i + 1) * fold_size };

            let test_indices = indices[start..end].to_vec();
            let train_indices = indices[..start]
                .iter()
                .chain(indices[end..].iter())
                .cloned()
                .collect();

            folds.push((train_indices, test_indices));
        }

        Ok(folds)
    }

    fn take_rows<T: Clone>(values: &[T], indices: &[usize]) -> Vec<T> {
        indices.iter().map(|&i| values[i].clone()).collect()
    }

    /// 交差検証によるモデル評価
    ///
    /// フォールドごとにモデルを複製して学習し、`scorer` でテスト部分を
    /// 評価します。いずれかのフォールドが失敗した場合は評価全体を中断します。
    pub fn cross_val_score<M: SupervisedModel + Clone>(
        model: &M,
        x: &[Vec<f64>],
        y: &[f64],
        scorer: &Scorer,
        cv: usize,
        random_seed: Option<u64>,
    ) -> Result<Vec<f64>> {
        if x.len() != y.len() {
            return Err(Error::LengthMismatch {
                expected: x.len(),
                actual: y.len(),
            });
        }

        let folds = k_fold_split(y.len(), cv, random_seed)?;
        let mut scores = Vec::with_capacity(cv);

        for (fold, (train_indices, test_indices)) in folds.iter().enumerate() {
            log::debug!(
                "fold {}/{}: {} train / {} test samples",
                fold + 1,
                cv,
                train_indices.len(),
                test_indices.len()
            );

            let x_train = take_rows(x, train_indices);
            let y_train = take_rows(y, train_indices);
            let x_test = take_rows(x, test_indices);
            let y_test = take_rows(y, test_indices);

            let mut fold_model = model.clone();
            let score = fold_model
                .fit(&x_train, &y_train)
                .and_then(|_| scorer.score(&fold_model, x_test.as_slice(), &y_test));

            match score {
                Ok(score) => scores.push(score),
                Err(err) => {
                    log::warn!(
                        "fold {} aborted evaluation with scorer '{}': {}",
                        fold + 1,
                        scorer.name(),
                        err
                    );
                    return Err(err);
                }
            }
        }

        Ok(scores)
    }
}
