//! Dashboard page rendering
//!
//! Charts are plain CSS: bar heights and widths are percentages of the
//! largest figure in each chart.

use crate::{format_money, AppState};
use acctbook_config::CurrencyConfig;
use acctbook_core::dashboard::{DueBuckets, MonthlyTotals};
use acctbook_core::DashboardData;
use acctbook_utils::escape_html;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

pub async fn page_dashboard(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
) -> axum::response::Html<String> {
    let ui = *state.ui.read().await;
    let data = DashboardData::placeholder();
    let currency = &state.config.currency;

    let inner_content = format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Dashboard</h2></div>
        <div class='bg-white dark:bg-gray-800 rounded-xl shadow-sm p-6 mb-6'>
            <div class='flex items-center justify-between mb-4'>
                <h3 class='text-lg font-semibold'>Invoices &amp; Expenses</h3>
                <span class='text-sm text-gray-500'>{}</span>
            </div>
            {}
        </div>
        <div class='grid grid-cols-1 md:grid-cols-2 gap-6 mb-6'>
            {}
            {}
        </div>
        <div class='bg-white dark:bg-gray-800 rounded-xl shadow-sm p-6'>
            <h3 class='text-lg font-semibold mb-4'>Top Expenses</h3>
            {}
        </div>"#,
        escape_html(&data.period),
        monthly_chart(&data.monthly, data.monthly_peak()),
        due_card("Money Coming In", &data.money_in, currency, "text-green-600"),
        due_card("Money Going Out", &data.money_out, currency, "text-red-600"),
        top_expenses(&data, currency)
    );

    axum::response::Html(crate::page_response(&headers, "Dashboard", "/dashboard", &inner_content, &ui))
}

/// `value` as a whole percentage of `peak`
fn percent_of(value: Decimal, peak: Decimal) -> u32 {
    if peak.is_zero() {
        return 0;
    }
    (value * Decimal::from(100) / peak)
        .round()
        .to_u32()
        .unwrap_or(0)
        .min(100)
}

fn monthly_chart(monthly: &[MonthlyTotals], peak: Decimal) -> String {
    let columns: String = monthly
        .iter()
        .map(|m| {
            format!(
                r#"<div class='flex-1 flex flex-col items-center gap-1'>
                    <div class='flex items-end gap-1 h-40 w-full justify-center'>
                        <div class='w-4 bg-indigo-500 rounded-t' style='height: {}%' title='Income {}'></div>
                        <div class='w-4 bg-indigo-200 rounded-t' style='height: {}%' title='Expense {}'></div>
                    </div>
                    <span class='text-xs text-gray-500'>{}</span>
                </div>"#,
                percent_of(m.income, peak),
                m.income,
                percent_of(m.expense, peak),
                m.expense,
                escape_html(&m.month.chars().take(3).collect::<String>())
            )
        })
        .collect();

    format!(
        r#"<div class='flex gap-2'>{}</div>
        <div class='flex gap-4 mt-3 text-xs text-gray-500'>
            <span class='flex items-center gap-1'><span class='w-3 h-3 bg-indigo-500 rounded'></span>Income</span>
            <span class='flex items-center gap-1'><span class='w-3 h-3 bg-indigo-200 rounded'></span>Expense</span>
        </div>"#,
        columns
    )
}

fn due_card(title: &str, buckets: &DueBuckets, currency: &CurrencyConfig, total_class: &str) -> String {
    let rows = [
        ("1-30 days", buckets.due_30),
        ("31-60 days", buckets.due_60),
        ("Overdue", buckets.overdue),
    ];
    let rows: String = rows
        .iter()
        .map(|(label, amount)| {
            format!(
                "<div class='flex justify-between py-2 border-b dark:border-gray-700'><span>{}</span><span class='font-medium'>{}</span></div>",
                label,
                format_money(*amount, currency)
            )
        })
        .collect();

    format!(
        r#"<div class='bg-white dark:bg-gray-800 rounded-xl shadow-sm p-6'>
            <h3 class='text-lg font-semibold mb-1'>{}</h3>
            <p class='text-2xl font-bold mb-4 {}'>{}</p>
            <div>{}</div>
        </div>"#,
        escape_html(title),
        total_class,
        format_money(buckets.total(), currency),
        rows
    )
}

fn top_expenses(data: &DashboardData, currency: &CurrencyConfig) -> String {
    let rows: String = data
        .top_expenses
        .iter()
        .map(|slice| {
            let share = data.expense_share(slice.amount);
            format!(
                r#"<div class='mb-3'>
                    <div class='flex justify-between text-sm mb-1'>
                        <span>{}</span><span class='text-gray-500'>{} ({}%)</span>
                    </div>
                    <div class='h-2 bg-gray-100 dark:bg-gray-700 rounded'>
                        <div class='h-2 rounded' style='width: {}%; background-color: {}'></div>
                    </div>
                </div>"#,
                escape_html(&slice.category),
                format_money(slice.amount, currency),
                share,
                share,
                escape_html(&slice.color)
            )
        })
        .collect();

    format!(
        r#"{}<div class='flex justify-between pt-3 border-t dark:border-gray-700 font-medium'><span>Total</span><span>{}</span></div>"#,
        rows,
        format_money(data.top_expenses_total(), currency)
    )
}
