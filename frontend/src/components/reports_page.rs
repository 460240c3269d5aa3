use yew::prelude::*;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use wasm_bindgen_futures::spawn_local;
use shared::{AttendanceRecord, MonthlyReportRow};

use super::flash::{show_flash, Flash, FlashMessage};
use crate::services::api::ApiClient;
use crate::services::csv_export::{
    attendance_history_csv, attendance_history_filename, download_csv, monthly_report_csv,
    monthly_report_filename,
};
use crate::services::date_utils::{
    current_year_month, format_check_in_time, format_display_date, month_name, recent_years,
};

#[derive(Clone, Copy, PartialEq)]
enum ReportTab {
    Monthly,
    History,
}

/// Total sessions and the per-student average, for the report summary
pub fn summarize(rows: &[MonthlyReportRow]) -> (i64, f64) {
    let total: i64 = rows.iter().map(|row| row.total_attendance).sum();
    let average = if rows.is_empty() {
        0.0
    } else {
        total as f64 / rows.len() as f64
    };
    (total, average)
}

#[derive(Properties, PartialEq)]
pub struct ReportsPageProps {
    pub api_client: ApiClient,
}

#[function_component(ReportsPage)]
pub fn reports_page(props: &ReportsPageProps) -> Html {
    let tab = use_state(|| ReportTab::Monthly);
    let year_month = use_state(current_year_month);
    let monthly = use_state(Vec::<MonthlyReportRow>::new);
    let history = use_state(Vec::<AttendanceRecord>::new);
    let start_date = use_state(String::new);
    let end_date = use_state(String::new);
    let loading = use_state(|| false);
    let flash = use_state(|| Option::<Flash>::None);

    // Reload the monthly report whenever the month or tab changes
    use_effect_with((*year_month, *tab == ReportTab::Monthly), {
        let api_client = props.api_client.clone();
        let monthly = monthly.clone();
        let loading = loading.clone();
        let flash = flash.clone();
        move |((year, month), is_monthly): &((i32, u32), bool)| {
            if *is_monthly {
                let (year, month) = (*year, *month);
                spawn_local(async move {
                    loading.set(true);
                    match api_client.get_monthly_report(year, month).await {
                        Ok(rows) => monthly.set(rows),
                        Err(e) => {
                            gloo::console::error!("Failed to fetch monthly report:", e.clone());
                            show_flash(&flash, Flash::Error("Failed to fetch monthly report".to_string()));
                        }
                    }
                    loading.set(false);
                });
            }
            || ()
        }
    });

    let select_tab = |target: ReportTab| {
        let tab = tab.clone();
        Callback::from(move |_: MouseEvent| tab.set(target))
    };

    let on_year = {
        let year_month = year_month.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            if let Ok(year) = select.value().parse() {
                year_month.set((year, year_month.1));
            }
        })
    };

    let on_month = {
        let year_month = year_month.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            if let Ok(month) = select.value().parse() {
                year_month.set((year_month.0, month));
            }
        })
    };

    let date_input = |handle: &UseStateHandle<String>| {
        let handle = handle.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            handle.set(input.value());
        })
    };
    let on_start = date_input(&start_date);
    let on_end = date_input(&end_date);

    let on_generate = {
        let api_client = props.api_client.clone();
        let start_date = start_date.clone();
        let end_date = end_date.clone();
        let history = history.clone();
        let loading = loading.clone();
        let flash = flash.clone();
        Callback::from(move |_| {
            if start_date.is_empty() || end_date.is_empty() {
                show_flash(&flash, Flash::Error("Please select both start and end dates".to_string()));
                return;
            }
            let api_client = api_client.clone();
            let (start, end) = ((*start_date).clone(), (*end_date).clone());
            let history = history.clone();
            let loading = loading.clone();
            let flash = flash.clone();
            spawn_local(async move {
                loading.set(true);
                match api_client.list_attendance_by_date_range(&start, &end).await {
                    Ok(records) => {
                        history.set(records);
                        flash.set(None);
                    }
                    Err(e) => {
                        gloo::console::error!("Failed to fetch attendance history:", e.clone());
                        show_flash(&flash, Flash::Error("Failed to fetch attendance history".to_string()));
                    }
                }
                loading.set(false);
            });
        })
    };

    let on_export_monthly = {
        let monthly = monthly.clone();
        let year_month = year_month.clone();
        let flash = flash.clone();
        Callback::from(move |_| {
            let (year, month) = *year_month;
            let result = monthly_report_csv(&monthly)
                .and_then(|csv| download_csv(&monthly_report_filename(year, month), &csv));
            if let Err(e) = result {
                show_flash(&flash, Flash::Error(e));
            }
        })
    };

    let on_export_history = {
        let history = history.clone();
        let start_date = start_date.clone();
        let end_date = end_date.clone();
        let flash = flash.clone();
        Callback::from(move |_| {
            let filename = attendance_history_filename(&start_date, &end_date);
            let result = attendance_history_csv(&history).and_then(|csv| download_csv(&filename, &csv));
            if let Err(e) = result {
                show_flash(&flash, Flash::Error(e));
            }
        })
    };

    let spinner = html! { <div class="loading"><div class="spinner"></div></div> };
    let (year, month) = *year_month;
    let (current_year, _) = current_year_month();

    let monthly_tab = html! {
        <div>
            <div class="card">
                <div class="report-controls">
                    <div class="form-group">
                        <label for="report-year">{"Year"}</label>
                        <select id="report-year" onchange={on_year}>
                            {for recent_years(current_year).into_iter().map(|y| html! {
                                <option value={y.to_string()} selected={y == year}>{y}</option>
                            })}
                        </select>
                    </div>
                    <div class="form-group">
                        <label for="report-month">{"Month"}</label>
                        <select id="report-month" onchange={on_month}>
                            {for (1..=12u32).map(|m| html! {
                                <option value={m.to_string()} selected={m == month}>{month_name(m)}</option>
                            })}
                        </select>
                    </div>
                    <button class="btn btn-success" onclick={on_export_monthly}>{"Export to CSV"}</button>
                </div>
            </div>
            {if *loading {
                spinner.clone()
            } else if monthly.is_empty() {
                html! { <p class="empty-state">{"No attendance records found for the selected period."}</p> }
            } else {
                let (total, average) = summarize(&monthly);
                html! {
                    <>
                        <table class="table">
                            <thead>
                                <tr>
                                    <th>{"Student Name"}</th>
                                    <th>{"Age"}</th>
                                    <th>{"Total Attendance"}</th>
                                    <th>{"Classes Attended"}</th>
                                </tr>
                            </thead>
                            <tbody>
                                {for monthly.iter().map(|row| html! {
                                    <tr key={row.student_id}>
                                        <td>{&row.student_name}</td>
                                        <td>{row.student_age}</td>
                                        <td><strong class="sessions">{format!("{} sessions", row.total_attendance)}</strong></td>
                                        <td>
                                            {if row.classes_attended.is_empty() {
                                                "No classes".to_string()
                                            } else {
                                                row.classes_attended.join(", ")
                                            }}
                                        </td>
                                    </tr>
                                })}
                            </tbody>
                        </table>
                        <div class="card">
                            <h3>{"Summary"}</h3>
                            <p><strong>{"Total Students: "}</strong>{monthly.len()}</p>
                            <p><strong>{"Total Sessions: "}</strong>{total}</p>
                            <p><strong>{"Average Attendance per Student: "}</strong>{format!("{:.2}", average)}</p>
                        </div>
                    </>
                }
            }}
        </div>
    };

    let history_tab = html! {
        <div>
            <div class="card">
                <div class="report-controls">
                    <div class="form-group">
                        <label for="history-start">{"Start Date"}</label>
                        <input id="history-start" type="date" value={(*start_date).clone()} onchange={on_start} />
                    </div>
                    <div class="form-group">
                        <label for="history-end">{"End Date"}</label>
                        <input id="history-end" type="date" value={(*end_date).clone()} onchange={on_end} />
                    </div>
                    <button class="btn btn-primary" onclick={on_generate}>{"Generate Report"}</button>
                    {if !history.is_empty() {
                        html! { <button class="btn btn-success" onclick={on_export_history}>{"Export to CSV"}</button> }
                    } else { html! {} }}
                </div>
            </div>
            {if *loading {
                spinner
            } else if history.is_empty() {
                html! {
                    <p class="empty-state">
                        {"Select a date range and click \"Generate Report\" to view attendance history."}
                    </p>
                }
            } else {
                html! {
                    <table class="table">
                        <thead>
                            <tr>
                                <th>{"Date"}</th>
                                <th>{"Student"}</th>
                                <th>{"Class"}</th>
                                <th>{"Check-in Time"}</th>
                            </tr>
                        </thead>
                        <tbody>
                            {for history.iter().map(|record| html! {
                                <tr key={record.id}>
                                    <td>{format_display_date(&record.date)}</td>
                                    <td>{&record.student_name}</td>
                                    <td>{&record.class_name}</td>
                                    <td>{format_check_in_time(&record.check_in_time)}</td>
                                </tr>
                            })}
                        </tbody>
                    </table>
                }
            }}
        </div>
    };

    let tab_class = |target: ReportTab| {
        if *tab == target { "btn btn-primary tab" } else { "btn btn-secondary tab" }
    };

    html! {
        <div class="page-container">
            <h1 class="page-title">{"Attendance Reports"}</h1>
            <FlashMessage flash={(*flash).clone()} />
            <div class="tabs">
                <button class={tab_class(ReportTab::Monthly)} onclick={select_tab(ReportTab::Monthly)}>
                    {"Monthly Billing Report"}
                </button>
                <button class={tab_class(ReportTab::History)} onclick={select_tab(ReportTab::History)}>
                    {"Attendance History"}
                </button>
            </div>
            {match *tab {
                ReportTab::Monthly => monthly_tab,
                ReportTab::History => history_tab,
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(total: i64) -> MonthlyReportRow {
        MonthlyReportRow {
            student_id: total,
            student_name: format!("Student {}", total),
            student_age: 10,
            total_attendance: total,
            classes_attended: Vec::new(),
        }
    }

    #[test]
    fn test_summary_totals_and_average() {
        let (total, average) = summarize(&[row(4), row(0), row(5)]);
        assert_eq!(total, 9);
        assert!((average - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_summary_of_empty_report() {
        assert_eq!(summarize(&[]), (0, 0.0));
    }
}
