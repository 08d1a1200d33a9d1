use clap::Subcommand;
use serde_json::json;

use crate::cli::context::CliContext;
use crate::cli::output::{output_table, output_value};
use crate::cli::OutputFormat;
use crate::console::Page;
use crate::routing::Route;

#[derive(Subcommand)]
pub enum CourseCommands {
    #[command(about = "List courses with their enrolment")]
    List,
}

pub async fn handle(server: Option<&str>, cmd: CourseCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = CliContext::connect(server, output_format).await?;

    match cmd {
        CourseCommands::List => {
            let Page::Courses(view) = ctx.open(Route::Courses).await? else {
                anyhow::bail!("unexpected page for {}", Route::Courses.path());
            };
            let courses = view.courses();
            let listing: Vec<_> = courses
                .iter()
                .map(|c| json!({ "id": c.id, "title": c.title, "students": view.enrolled(&c.id) }))
                .collect();

            output_value(&ctx.output_format, &listing, || {
                let table: Vec<Vec<String>> = courses
                    .iter()
                    .map(|c| vec![c.id.clone(), c.title.clone(), view.enrolled(&c.id).to_string()])
                    .collect();
                output_table(&["ID", "TITLE", "STUDENTS"], &table, "No courses found");
                Ok(())
            })
        }
    }
}
