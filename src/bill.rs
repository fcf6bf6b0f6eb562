//! 전기 요금 추정기.

/// 요금 계산 입력 오류.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BillError {
    #[error("입력 오류 ({0}): 0 이상의 유한한 숫자여야 합니다.")]
    InvalidInput(&'static str),
}

/// 요금 계산 입력값.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BillInput {
    /// 부하 전력 [kW]
    pub power_kw: f64,
    /// 하루 사용 시간 [h]
    pub hours_per_day: f64,
    /// 전력량 단가 [통화/kWh]
    pub price_per_kwh: f64,
}

impl Default for BillInput {
    fn default() -> Self {
        Self {
            power_kw: 2.5,
            hours_per_day: 8.0,
            price_per_kwh: 0.15,
        }
    }
}

/// 요금 계산 결과.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BillEstimate {
    pub daily_kwh: f64,
    pub daily_cost: f64,
    /// 30일 기준
    pub monthly_cost: f64,
    /// 365일 기준
    pub yearly_cost: f64,
}

pub const DAYS_PER_MONTH: f64 = 30.0;
pub const DAYS_PER_YEAR: f64 = 365.0;

/// 일/월/연 전력량과 요금을 계산한다.
pub fn estimate_bill(input: BillInput) -> Result<BillEstimate, BillError> {
    check("power_kw", input.power_kw)?;
    check("hours_per_day", input.hours_per_day)?;
    check("price_per_kwh", input.price_per_kwh)?;

    let daily_kwh = input.power_kw * input.hours_per_day;
    let daily_cost = daily_kwh * input.price_per_kwh;
    Ok(BillEstimate {
        daily_kwh,
        daily_cost,
        monthly_cost: daily_cost * DAYS_PER_MONTH,
        yearly_cost: daily_cost * DAYS_PER_YEAR,
    })
}

fn check(field: &'static str, v: f64) -> Result<(), BillError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(BillError::InvalidInput(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_household_load() {
        let est = estimate_bill(BillInput::default()).unwrap();
        assert!((est.daily_kwh - 20.0).abs() < 1e-9);
        assert!((est.daily_cost - 3.0).abs() < 1e-9);
        assert!((est.monthly_cost - 90.0).abs() < 1e-9);
        assert!((est.yearly_cost - 1095.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_nan_hours() {
        let err = estimate_bill(BillInput {
            hours_per_day: f64::NAN,
            ..BillInput::default()
        })
        .unwrap_err();
        assert_eq!(err, BillError::InvalidInput("hours_per_day"));
    }
}
