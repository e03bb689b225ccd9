use quickcheck_macros::quickcheck;
use rsi_recommender::aggregate;
use rsi_recommender::analysis::rsi_series;

fn to_rsi(raw: &[u8]) -> Vec<f64> {
    raw.iter().map(|r| f64::from(r % 101)).collect()
}

#[quickcheck]
fn buy_and_sell_sum_to_one(raw: Vec<u8>) -> bool {
    match aggregate(&to_rsi(&raw)) {
        Some(score) => {
            (score.buy + score.sell - 1.0).abs() < 1e-12 && (0.0..=1.0).contains(&score.sell)
        }
        None => raw.is_empty(),
    }
}

#[quickcheck]
fn raising_one_reading_never_lowers_sell(raw: Vec<u8>, index: usize, bump: u8) -> bool {
    if raw.is_empty() {
        return true;
    }
    let readings = to_rsi(&raw);
    let i = index % readings.len();
    let mut raised = readings.clone();
    raised[i] = (raised[i] + f64::from(bump)).min(100.0);

    let (Some(before), Some(after)) = (aggregate(&readings), aggregate(&raised)) else {
        return false;
    };
    after.sell >= before.sell - 1e-12
}

#[quickcheck]
fn earlier_reading_outweighs_later_one(a: u8, b: u8) -> bool {
    let (a, b) = (f64::from(a % 101), f64::from(b % 101));
    if a == b {
        return true;
    }
    let Some(score) = aggregate(&[a, b]) else {
        return false;
    };
    let midpoint = (a + b) / 200.0;
    if a > b {
        score.sell > midpoint
    } else {
        score.sell < midpoint
    }
}

#[quickcheck]
fn rsi_stays_within_bounds(raw: Vec<u16>, window: u8) -> bool {
    let closes: Vec<f64> = raw.iter().map(|c| f64::from(*c) + 1.0).collect();
    let window = usize::from(window % 30) + 1;
    rsi_series(&closes, window)
        .iter()
        .all(|r| r.is_nan() || (0.0..=100.0).contains(r))
}

#[quickcheck]
fn strictly_rising_closes_read_100(len: u8, window: u8) -> bool {
    let len = usize::from(len % 50) + 2;
    let window = usize::from(window % 30) + 1;
    let closes: Vec<f64> = (0..len).map(|i| 10.0 + i as f64).collect();
    rsi_series(&closes, window).last() == Some(&100.0)
}
