use crate::cli::context::CliContext;
use crate::cli::output::output_value;
use crate::cli::OutputFormat;
use crate::console::Page;
use crate::routing::Route;

pub async fn handle(server: Option<&str>, output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = CliContext::connect(server, output_format).await?;
    let Page::Dashboard(view) = ctx.open(Route::Dashboard).await? else {
        anyhow::bail!("unexpected page for {}", Route::Dashboard.path());
    };
    let summary = view
        .summary()
        .ok_or_else(|| anyhow::anyhow!("Dashboard is still loading"))?;

    output_value(&ctx.output_format, &summary, || {
        println!("Students:   {}", summary.students);
        println!("Courses:    {}", summary.courses);
        println!("Attendance: {}", summary.attendance);
        Ok(())
    })
}
