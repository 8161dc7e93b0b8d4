/// Bybit-style closed P&L export with `n` rows cycling through a few symbols.
pub fn bybit_export(n: usize) -> String {
    let symbols = ["BTCUSDT", "ETHUSDT", "SOLUSDT", "LINKUSDT"];
    let mut text = String::from(
        "Contracts,Side,Qty,Entry Price,Exit Price,Closed P&L,Trade Time(UTC)\n",
    );
    for i in 0..n {
        let entry = 100.0 + i as f64;
        let exit = if i % 3 == 0 { entry - 2.0 } else { entry + 4.0 };
        let pnl = exit - entry;
        text.push_str(&format!(
            "{},{},1,{:.2},{:.2},{:.2},2024-01-15 {:02}:{:02}:00\n",
            symbols[i % symbols.len()],
            if i % 2 == 0 { "Buy" } else { "Sell" },
            entry,
            exit,
            pnl,
            (i / 60) % 24,
            i % 60,
        ));
    }
    text
}

/// `n` rows of `Symbol,PnL` alternating between a win and a loss.
pub fn alternating_pnl(n: usize) -> String {
    let mut text = String::from("Symbol,PnL\n");
    for i in 0..n {
        let pnl = if i % 2 == 0 { 10 } else { -5 };
        text.push_str(&format!("BTCUSDT,{}\n", pnl));
    }
    text
}
