use serde::Serialize;

use crate::{PricePoint, PriceTable, Symbol};

/// Symmetric Pearson correlation matrix over close prices.
///
/// Undefined entries are NaN and serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub symbols: Vec<Symbol>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &Symbol, b: &Symbol) -> Option<f64> {
        let row = self.symbols.iter().position(|symbol| symbol == a)?;
        let column = self.symbols.iter().position(|symbol| symbol == b)?;
        Some(self.values[row][column])
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Pearson correlation of two equally long samples.
///
/// NaN when there are fewer than two points, either sample has zero
/// variance, or any input is non-finite.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return f64::NAN;
    }
    let (x, y) = (&x[..n], &y[..n]);

    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    let r = sxy / (sxx.sqrt() * syy.sqrt());
    if r.is_finite() {
        r.clamp(-1.0, 1.0)
    } else {
        f64::NAN
    }
}

/// Pairwise correlation of close prices for every ticker in the table.
///
/// Each pair is aligned on the dates both tickers share.
pub fn correlation_matrix(table: &PriceTable) -> CorrelationMatrix {
    let series = table.series();
    let n = series.len();
    let mut values = vec![vec![f64::NAN; n]; n];

    for i in 0..n {
        let closes: Vec<f64> = series[i].closes().collect();
        values[i][i] = if pearson(&closes, &closes).is_nan() {
            f64::NAN
        } else {
            1.0
        };

        for j in (i + 1)..n {
            let (x, y) = align_closes(series[i].points(), series[j].points());
            let r = pearson(&x, &y);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        symbols: table.symbols(),
        values,
    }
}

/// Closes on the dates present in both date-sorted series.
fn align_closes(a: &[PricePoint], b: &[PricePoint]) -> (Vec<f64>, Vec<f64>) {
    let mut x = Vec::new();
    let mut y = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].date.cmp(&b[j].date) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                x.push(a[i].close);
                y.push(b[j].close);
                i += 1;
                j += 1;
            }
        }
    }
    (x, y)
}
