use chrono::Local;
use clap::Subcommand;

use crate::cli::context::CliContext;
use crate::cli::output::{output_table, output_value};
use crate::cli::OutputFormat;
use crate::console::Page;
use crate::model::AttendanceStatus;
use crate::mutation::AttendanceForm;
use crate::routing::Route;
use crate::views::AttendanceView;

#[derive(Subcommand)]
pub enum AttendanceCommands {
    #[command(about = "List attendance records")]
    List {
        #[arg(long, help = "Only show records for this date (YYYY-MM-DD)")]
        date: Option<String>,
    },

    #[command(about = "Record attendance for a student in a course")]
    Record {
        #[arg(long, help = "Student id")]
        student: Option<String>,
        #[arg(long, help = "Course id")]
        course: Option<String>,
        #[arg(long, help = "Date (YYYY-MM-DD), defaults to today")]
        date: Option<String>,
        #[arg(long, help = "Present or Absent")]
        status: Option<AttendanceStatus>,
    },
}

async fn attendance_view(ctx: &CliContext) -> anyhow::Result<AttendanceView> {
    match ctx.open(Route::Attendance).await? {
        Page::Attendance(view) => Ok(view),
        _ => anyhow::bail!("unexpected page for {}", Route::Attendance.path()),
    }
}

pub async fn handle(server: Option<&str>, cmd: AttendanceCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut ctx = CliContext::connect(server, output_format).await?;
    let mut view = attendance_view(&ctx).await?;

    match cmd {
        AttendanceCommands::List { date } => {
            view.date_filter = date.unwrap_or_default();
            let rows = view.rows();
            output_value(&ctx.output_format, &rows, || {
                let table: Vec<Vec<String>> = rows
                    .iter()
                    .map(|r| {
                        vec![
                            r.index.to_string(),
                            r.student.clone(),
                            r.course.clone(),
                            r.date.clone(),
                            r.status.to_string(),
                        ]
                    })
                    .collect();
                let empty = view.empty_message().unwrap_or_default();
                output_table(&["#", "STUDENT", "COURSE", "DATE", "STATUS"], &table, &empty);
                Ok(())
            })
        }
        AttendanceCommands::Record {
            student,
            course,
            date,
            status,
        } => {
            let mut form = AttendanceForm {
                student_id: student.unwrap_or_default(),
                course_id: course.unwrap_or_default(),
                date: date.unwrap_or_else(|| Local::now().format("%Y-%m-%d").to_string()),
                status,
            };
            let status = ctx.console.pipeline().record_attendance(&mut form).await;
            ctx.report(status)
        }
    }
}
