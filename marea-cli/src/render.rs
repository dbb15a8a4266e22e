use std::fmt::Write as _;

use rust_decimal::Decimal;

use marea_report::{ClientStatement, DailyReport};

/// Currency formatting used across every rendered surface: two decimals
/// with thousands separators, e.g. `RD$ 1,500.00`.
pub fn money(value: Decimal) -> String {
    let raw = format!("{:.2}", value);
    let (sign, rest) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw.as_str()),
    };
    let (whole, frac) = rest.split_once('.').unwrap_or((rest, "00"));
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, digit) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("RD$ {sign}{grouped}.{frac}")
}

/// Plain-text daily report: KPI lines plus the rollup tables.
pub fn daily_report_text(report: &DailyReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Reporte Diario - {}", report.date.format("%Y-%m-%d"));
    if report.is_empty() {
        let _ = writeln!(out, "No hay datos para el día.");
        return out;
    }
    let _ = writeln!(out, "Total Vendido:      {}", money(report.total_revenue));
    let _ = writeln!(out, "Ganancias Totales:  {}", money(report.total_profit));
    let _ = writeln!(out, "Unidades Vendidas:  {}", report.total_units);
    let _ = writeln!(out);
    let _ = writeln!(out, "Por Producto:");
    for (product, sales) in &report.by_product {
        let _ = writeln!(
            out,
            "  {:<30} {:>5}  {:>14}",
            product,
            sales.units,
            money(sales.revenue)
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Por Cliente:");
    for (client, sales) in &report.by_client {
        let _ = writeln!(
            out,
            "  {:<30} {:>14}  {:>14}",
            client,
            money(sales.revenue),
            money(sales.profit)
        );
    }
    if !report.payment_distribution.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Métodos de Pago:");
        for (method, count) in &report.payment_distribution {
            let _ = writeln!(out, "  {:<15} {}", method.as_str(), count);
        }
    }
    if !report.unpaid_rows.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Clientes que NO han pagado:");
        for row in &report.unpaid_rows {
            let _ = writeln!(out, "  {:<30} {:>14}", row.client, money(row.amount_total));
        }
        let _ = writeln!(out, "Total no pagado: {}", money(report.total_unpaid_amount));
    }
    out
}

/// Static HTML export of the daily report, one row per consumption.
pub fn daily_report_html(report: &DailyReport) -> String {
    let mut rows = String::new();
    for row in &report.rows {
        let _ = write!(
            rows,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape(&row.client),
            escape(&row.product),
            row.quantity,
            money(row.amount_total),
            row.payment.map(|method| method.as_str()).unwrap_or(""),
        );
    }
    format!(
        r#"<html>
<head>
<title>Reporte Diario - {date}</title>
<style>
body {{ font-family: Arial, sans-serif; margin: 20px; }}
h1 {{ text-align: center; }}
table {{ width: 100%; border-collapse: collapse; margin: 20px 0; }}
th, td {{ border: 1px solid #ddd; text-align: left; padding: 8px; }}
th {{ background-color: #f2f2f2; }}
.kpi {{ font-size: 18px; margin: 10px 0; }}
</style>
</head>
<body>
<h1>Reporte Diario</h1>
<div class="kpi">Total Vendido: {revenue}</div>
<div class="kpi">Ganancias Totales: {profit}</div>
<div class="kpi">Unidades Vendidas: {units}</div>
<table>
<thead>
<tr><th>Cliente</th><th>Producto</th><th>Cantidad</th><th>Total</th><th>Pago</th></tr>
</thead>
<tbody>
{rows}</tbody>
</table>
</body>
</html>
"#,
        date = report.date.format("%Y-%m-%d"),
        revenue = money(report.total_revenue),
        profit = money(report.total_profit),
        units = report.total_units,
        rows = rows,
    )
}

/// Fixed-width printed invoice for one client's open tab.
pub fn invoice_text(statement: &ClientStatement) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Factura para: {}", statement.client);
    let _ = writeln!(out, "{}", "=".repeat(63));
    let _ = writeln!(out, "{:<10}{:<40}{:>13}", "Cantidad", "Producto", "Total");
    let _ = writeln!(out, "{}", "-".repeat(63));
    for row in &statement.rows {
        let _ = writeln!(
            out,
            "{:<10}{:<40}{:>13}",
            row.quantity,
            row.product,
            money(row.amount_total)
        );
    }
    let _ = writeln!(out, "{}", "=".repeat(63));
    let _ = writeln!(out, "{:<50}{:>13}", "Total acumulado:", money(statement.total));
    let _ = writeln!(out, "{}", "=".repeat(63));
    out
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
