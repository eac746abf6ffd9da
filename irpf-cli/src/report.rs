//! Human-readable and JSON renderings of a [`MethodComparison`].

use std::fmt::Write as _;

use chrono::{DateTime, TimeZone};
use irpf_core::calculations::common::round_half_up;
use irpf_core::{CalculationInput, CalculationResult, DeductionMethod, MethodComparison, TaxTable};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

const LABEL_WIDTH: usize = 30;
const COLUMN_WIDTH: usize = 16;

/// Formats an amount as Brazilian currency, e.g. `R$ 1.234,56`.
///
/// ```
/// use rust_decimal_macros::dec;
/// use irpf_cli::report::format_brl;
///
/// assert_eq!(format_brl(dec!(6000)), "R$ 6.000,00");
/// assert_eq!(format_brl(dec!(-182.164)), "-R$ 182,16");
/// ```
pub fn format_brl(value: Decimal) -> String {
    let rounded = round_half_up(value);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let text = format!("{:.2}", rounded.abs());
    let (units, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    format!("{sign}R$ {},{cents}", group_thousands(units))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats a fraction as a percentage with a decimal comma, e.g. `27,5%`.
pub fn format_percent(
    rate: Decimal,
    decimals: u32,
) -> String {
    let percent = (rate * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.*}", decimals as usize, percent);
    format!("{}%", text.replace('.', ","))
}

fn line(
    out: &mut String,
    label: &str,
    value: impl std::fmt::Display,
) {
    let _ = writeln!(out, "  {label:<LABEL_WIDTH$}{value}");
}

/// Renders the full text report for one calculation.
pub fn render_text<Tz>(
    input: &CalculationInput,
    comparison: &MethodComparison,
    year: i32,
    calculated_at: &DateTime<Tz>,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let selected = comparison.selected_result();
    let mut out = String::new();

    let _ = writeln!(out, "Cálculo IRPF Mensal – Regras {year}");
    let _ = writeln!(out, "Base: Lei 15.270/2025 e IN RFB 2.299/2025");
    let _ = writeln!(
        out,
        "Data do cálculo: {}",
        calculated_at.format("%d/%m/%Y %H:%M")
    );

    let _ = writeln!(out, "\nEntradas");
    line(&mut out, "Rendimento bruto:", format_brl(input.gross_income()));
    line(&mut out, "INSS:", format_brl(input.social_security_contribution()));
    line(&mut out, "Dependentes:", input.dependent_count());

    let _ = writeln!(out, "\nResultado");
    line(&mut out, "Método escolhido:", comparison.selected_method.label_pt());
    line(&mut out, "Base de cálculo:", format_brl(selected.taxable_base));
    line(&mut out, "Alíquota da faixa:", format_percent(selected.bracket_rate, 1));
    line(&mut out, "IR apurado (tabela):", format_brl(selected.gross_tax));
    line(
        &mut out,
        "Redução Lei 15.270/2025:",
        format_brl(selected.statutory_reduction),
    );
    line(&mut out, "IR a recolher:", format_brl(selected.net_tax));
    line(&mut out, "Alíquota efetiva:", format_percent(selected.effective_rate, 2));

    let _ = writeln!(out, "\nDetalhes");
    line(&mut out, "Dedução dependentes:", format_brl(selected.dependent_deduction));
    line(&mut out, "Desconto simplificado:", format_brl(selected.standard_discount));
    line(
        &mut out,
        "Parcela a deduzir (tabela):",
        format_brl(selected.bracket_deduction),
    );

    render_comparison(&mut out, comparison);
    out
}

fn render_comparison(
    out: &mut String,
    comparison: &MethodComparison,
) {
    let rows: [(&str, fn(&CalculationResult) -> Decimal); 4] = [
        ("Base de cálculo", |r| r.taxable_base),
        ("IR apurado", |r| r.gross_tax),
        ("Redução", |r| r.statutory_reduction),
        ("IR a recolher", |r| r.net_tax),
    ];

    let _ = write!(out, "\n  {:<LABEL_WIDTH$}", "Comparação");
    for method in DeductionMethod::all() {
        let _ = write!(out, "{:>COLUMN_WIDTH$}", method.label_pt());
    }
    let _ = writeln!(out);

    for (label, value) in rows {
        let _ = write!(out, "  {label:<LABEL_WIDTH$}");
        for &method in DeductionMethod::all() {
            let _ = write!(
                out,
                "{:>COLUMN_WIDTH$}",
                format_brl(value(comparison.result_for(method)))
            );
        }
        let _ = writeln!(out);
    }
    line(out, "Economia:", format_brl(comparison.savings()));
}

/// Renders the active table and constants.
pub fn render_table(table: &TaxTable) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Tabela progressiva mensal {}", table.year);
    let _ = writeln!(
        out,
        "  {:<20}{:>10}{:>COLUMN_WIDTH$}",
        "Até", "Alíquota", "Parcela"
    );
    for bracket in &table.brackets {
        let upper = bracket
            .upper_bound
            .map(format_brl)
            .unwrap_or_else(|| "acima".to_string());
        let _ = writeln!(
            out,
            "  {upper:<20}{:>10}{:>COLUMN_WIDTH$}",
            format_percent(bracket.rate, 1),
            format_brl(bracket.deduction)
        );
    }

    let _ = writeln!(out);
    line(&mut out, "Dedução por dependente:", format_brl(table.dependent_deduction));
    line(&mut out, "Desconto simplificado:", format_brl(table.standard_discount));
    line(
        &mut out,
        "Isenção total até:",
        format_brl(table.reduction.exemption_ceiling),
    );
    line(
        &mut out,
        "Redução decrescente até:",
        format_brl(table.reduction.taper_ceiling),
    );
    line(
        &mut out,
        "Fórmula da redução:",
        format!(
            "{} − {} × rendimento",
            table.reduction.taper_constant, table.reduction.taper_factor
        ),
    );
    out
}

/// JSON shape of one calculation: the inputs, the choice and both methods.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub input: &'a CalculationInput,
    pub selected_method: DeductionMethod,
    pub selected: &'a CalculationResult,
    pub itemized: &'a CalculationResult,
    pub simplified: &'a CalculationResult,
}

impl<'a> JsonReport<'a> {
    pub fn new(
        input: &'a CalculationInput,
        comparison: &'a MethodComparison,
    ) -> Self {
        Self {
            input,
            selected_method: comparison.selected_method,
            selected: comparison.selected_result(),
            itemized: &comparison.itemized,
            simplified: &comparison.simplified,
        }
    }
}
