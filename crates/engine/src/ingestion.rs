use tracing::debug;

use common::{Candle, CurrencyPair, Error, Result};

use crate::session::SessionState;
use crate::settings::parse_number;

/// Apply a `next_candles` payload: `;`-separated records laid out per the
/// session's candle format.
///
/// Every record is appended to its pair's history. The first record's date
/// becomes the present date; the last record's close and volume extend the
/// price and volume logs and its pair becomes the selected pair. Nothing is
/// applied if any record fails to parse.
pub fn ingest_next_candles(session: &mut SessionState, payload: &str) -> Result<()> {
    let schema = session
        .settings
        .candle_format
        .as_ref()
        .ok_or(Error::MissingCandleFormat)?;

    let candles = payload
        .split(';')
        .map(|record| schema.parse_record(record))
        .collect::<Result<Vec<Candle>>>()?;
    let pairs = candles
        .iter()
        .map(|c| CurrencyPair::parse(&c.pair))
        .collect::<Result<Vec<CurrencyPair>>>()?;

    // split(';') always yields at least one record
    let (Some(first), Some(last), Some(selected)) = (candles.first(), candles.last(), pairs.last())
    else {
        return Err(Error::InsufficientData("empty candle update".into()));
    };

    session.present_date = first.date;
    session.price_log.push(last.close);
    session.volume_log.push(last.volume);
    session.selected_pair = Some(selected.clone());
    for candle in &candles {
        session.market.append(candle);
    }

    debug!(
        present_date = ?first.timestamp(),
        pair = %selected,
        close = last.close,
        volume = last.volume,
        records = candles.len(),
        "Candles ingested"
    );
    Ok(())
}

/// Apply a `stacks` payload: `,`-separated `currency:amount` balances.
pub fn ingest_stacks(session: &mut SessionState, payload: &str) -> Result<()> {
    let balances = payload
        .split(',')
        .map(|entry| {
            let (currency, amount) = entry.split_once(':').ok_or_else(|| Error::Protocol {
                line: payload.to_string(),
                reason: format!("balance '{entry}' is not currency:amount"),
            })?;
            Ok((currency.trim().to_string(), parse_number::<f64>(currency, amount)?))
        })
        .collect::<Result<Vec<(String, f64)>>>()?;

    for (currency, amount) in balances {
        debug!(%currency, amount, "Balance updated");
        session.funds.insert(currency, amount);
    }
    Ok(())
}
