// ==========================================
// 商业物业租赁管理系统 - 批量抄表工作台入口
// ==========================================
// 库优先：这里只做最薄的命令分发，便于运维排查与脱离桌面壳使用
// ==========================================

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use leasing_meter_intake::app::AppState;
use leasing_meter_intake::config::Settings;
use leasing_meter_intake::logging;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", leasing_meter_intake::APP_NAME);
    tracing::info!("系统版本: {}", leasing_meter_intake::VERSION);
    tracing::info!("==================================================");

    let settings = Settings::load()?;
    leasing_meter_intake::i18n::set_locale(&settings.locale);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first().map(|s| s.as_str()) else {
        print_usage();
        return Ok(());
    };

    let state = AppState::new(settings).map_err(|e| anyhow::anyhow!(e))?;
    let api = state.intake_api.clone();

    match command {
        // 楼栋列表
        "buildings" => {
            let buildings = api.load_buildings().await?;
            for building in buildings {
                println!("{}\t{}", building.building_id, building.name);
            }
        }

        // 加载楼栋行集并打印抄表状态
        "probe" => {
            let (building_id, date) = parse_selection(&args)?;
            let rows = api.select_building(&building_id, date).await?;
            for row in rows {
                let status = match &row.ineligible_reason {
                    Some(reason) => reason.to_string(),
                    None if row.has_any_reading() => "本期已抄表".to_string(),
                    None => format!(
                        "上期 电:{} 水:{}",
                        row.prev_electricity, row.prev_water
                    ),
                };
                println!("{}\t{}\t{}", row.unit_no, row.phase, status);
            }
        }

        // 导出抄表模板
        "template" => {
            let (building_id, date) = parse_selection(&args)?;
            let output = args
                .get(3)
                .context("用法: template <楼栋ID> <日期> <输出.xlsx>")?;
            api.select_building(&building_id, date).await?;
            api.export_template(output)?;
            println!("模板已导出: {}", output);
        }

        // 导入已填写的工作簿（只校验与回填，不提交）
        "import" => {
            let (building_id, date) = parse_selection(&args)?;
            let input = args
                .get(3)
                .context("用法: import <楼栋ID> <日期> <文件.xlsx|.csv>")?;
            api.select_building(&building_id, date).await?;
            let outcome = api.import_workbook(input)?;
            println!("{}", outcome.summary());
        }

        // 导入并批量提交
        "submit" => {
            let (building_id, date) = parse_selection(&args)?;
            let input = args
                .get(3)
                .context("用法: submit <楼栋ID> <日期> <文件.xlsx|.csv>")?;
            api.select_building(&building_id, date).await?;
            let outcome = api.import_workbook(input)?;
            println!("{}", outcome.summary());

            let report = api.submit_batch().await?;
            println!(
                "已提交 {} 条记录 (batch_id={}{})",
                report.submitted(),
                report.batch_id,
                if report.used_fallback {
                    "，经备用接口"
                } else {
                    ""
                }
            );
        }

        _ => {
            print_usage();
            bail!("未知命令: {}", command);
        }
    }

    Ok(())
}

fn parse_selection(args: &[String]) -> Result<(String, NaiveDate)> {
    let building_id = args
        .get(1)
        .context("缺少楼栋ID参数")?
        .to_string();
    let date: NaiveDate = args
        .get(2)
        .context("缺少日期参数 (YYYY-MM-DD)")?
        .parse()
        .context("日期格式应为 YYYY-MM-DD")?;
    Ok((building_id, date))
}

fn print_usage() {
    println!("{} v{}", leasing_meter_intake::APP_NAME, leasing_meter_intake::VERSION);
    println!();
    println!("用法:");
    println!("  buildings                                 列出楼栋");
    println!("  probe    <楼栋ID> <日期>                  加载并打印抄表状态");
    println!("  template <楼栋ID> <日期> <输出.xlsx>      导出抄表模板");
    println!("  import   <楼栋ID> <日期> <文件>           导入工作簿（只校验）");
    println!("  submit   <楼栋ID> <日期> <文件>           导入并批量提交");
    println!();
    println!("环境变量:");
    println!("  LEASING_API_BASE_URL          后端接口地址");
    println!("  LEASING_METER_SETTINGS_PATH   配置文件路径");
    println!("  RUST_LOG                      日志级别");
}
