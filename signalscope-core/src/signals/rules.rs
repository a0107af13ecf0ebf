//! Condition sets behind the two signal policies.
//!
//! Every comparison runs on [`Readings`], where an undefined indicator value
//! is `None`. A comparison involving `None` is false.

use serde::Serialize;

use crate::domain::Bar;
use crate::frame::{columns, IndicatorFrame};

pub const ADX_TREND_FLOOR: f64 = 20.0;

pub const THRESHOLD_RSI_OVERSOLD: f64 = 35.0;
pub const THRESHOLD_RSI_OVERBOUGHT: f64 = 65.0;
pub const THRESHOLD_MFI_OVERSOLD: f64 = 35.0;
pub const THRESHOLD_MFI_OVERBOUGHT: f64 = 65.0;

pub const VOTE_RSI_BULL: f64 = 55.0;
pub const VOTE_RSI_BEAR: f64 = 45.0;
pub const VOTE_MFI_BULL: f64 = 60.0;
pub const VOTE_MFI_BEAR: f64 = 40.0;

/// Conditions that must hold for a majority-vote side to win.
pub const VOTE_QUORUM: usize = 4;

/// Indicator values at one bar.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Readings {
    pub close: f64,
    pub rsi: Option<f64>,
    pub psar: Option<f64>,
    pub adx: Option<f64>,
    pub plus_di: Option<f64>,
    pub minus_di: Option<f64>,
    pub mfi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub momentum: Option<f64>,
    pub fisher: Option<f64>,
    /// Fisher on the previous bar.
    pub fisher_prev: Option<f64>,
    pub atr: Option<f64>,
}

impl Readings {
    pub fn at(frame: &IndicatorFrame, bars: &[Bar], index: usize) -> Self {
        let get = |name: &str| frame.get(name, index);
        Self {
            close: bars[index].close,
            rsi: get(columns::RSI),
            psar: get(columns::PSAR),
            adx: get(columns::ADX),
            plus_di: get(columns::PLUS_DI),
            minus_di: get(columns::MINUS_DI),
            mfi: get(columns::MFI),
            macd: get(columns::MACD),
            macd_signal: get(columns::MACD_SIGNAL),
            momentum: get(columns::MOMENTUM),
            fisher: get(columns::FISHER),
            fisher_prev: index
                .checked_sub(1)
                .and_then(|prev| frame.get(columns::FISHER, prev)),
            atr: get(columns::ATR),
        }
    }

    fn trending(&self) -> bool {
        above(self.adx, Some(ADX_TREND_FLOOR))
    }

    fn trend_up(&self) -> bool {
        self.trending() && above(self.plus_di, self.minus_di)
    }

    fn trend_down(&self) -> bool {
        self.trending() && above(self.minus_di, self.plus_di)
    }
}

fn above(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a > b)
}

fn below(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a < b)
}

/// Oversold with a confirmed uptrend and rising Fisher.
pub fn threshold_buy(r: &Readings) -> bool {
    below(r.rsi, Some(THRESHOLD_RSI_OVERSOLD))
        && below(r.psar, Some(r.close))
        && r.trend_up()
        && below(r.mfi, Some(THRESHOLD_MFI_OVERSOLD))
        && above(r.fisher, r.fisher_prev)
}

pub fn threshold_sell(r: &Readings) -> bool {
    above(r.rsi, Some(THRESHOLD_RSI_OVERBOUGHT))
        && above(r.psar, Some(r.close))
        && r.trend_down()
        && above(r.mfi, Some(THRESHOLD_MFI_OVERBOUGHT))
        && below(r.fisher, r.fisher_prev)
}

/// One named majority-vote condition and whether it held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoteCondition {
    pub name: &'static str,
    pub met: bool,
}

fn vote(name: &'static str, met: bool) -> VoteCondition {
    VoteCondition { name, met }
}

pub fn bullish_conditions(r: &Readings) -> [VoteCondition; 6] {
    [
        vote("macd_above_signal", above(r.macd, r.macd_signal)),
        vote("rsi_above_55", above(r.rsi, Some(VOTE_RSI_BULL))),
        vote("adx_trend_up", r.trend_up()),
        vote("mfi_above_60", above(r.mfi, Some(VOTE_MFI_BULL))),
        vote("psar_below_close", below(r.psar, Some(r.close))),
        vote("momentum_positive", above(r.momentum, Some(0.0))),
    ]
}

pub fn bearish_conditions(r: &Readings) -> [VoteCondition; 6] {
    [
        vote("macd_below_signal", below(r.macd, r.macd_signal)),
        vote("rsi_below_45", below(r.rsi, Some(VOTE_RSI_BEAR))),
        vote("adx_trend_down", r.trend_down()),
        vote("mfi_below_40", below(r.mfi, Some(VOTE_MFI_BEAR))),
        vote("psar_above_close", above(r.psar, Some(r.close))),
        vote("momentum_negative", below(r.momentum, Some(0.0))),
    ]
}

pub fn count_met(conditions: &[VoteCondition]) -> usize {
    conditions.iter().filter(|c| c.met).count()
}
