//! 스크리닝 실행 명령.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use screener_core::config::AppConfig;
use screener_core::domain::OpportunityRecord;
use screener_core::types::round_dp;
use screener_exchange::{BinanceMarketConfig, BinanceMarketData};
use screener_notification::{NotificationManager, TelegramSender};
use screener_pipeline::{OpportunityPipeline, ScreenReport};

/// 스크리닝 한 번을 실행하고 결과를 출력합니다.
pub async fn run_screen(config: AppConfig) -> Result<ScreenReport> {
    let provider = BinanceMarketData::new(BinanceMarketConfig {
        base_url: config.exchange.base_url.clone(),
        quote_asset: config.universe.quote_asset.clone(),
        timeout_secs: config.exchange.timeout_secs,
    })
    .context("시장 데이터 제공자 생성 실패")?;

    let pipeline = OpportunityPipeline::new(Arc::new(provider), &config)
        .context("파이프라인 조립 실패")?;

    let report = pipeline.run().await.context("스크리닝 실행 실패")?;

    print_report(&report);

    if config.notification.enabled {
        send_alerts(&config, &report).await;
    }

    Ok(report)
}

/// 순위 목록과 최우선 종목을 표로 출력합니다.
fn print_report(report: &ScreenReport) {
    if report.is_empty() {
        println!("\n조건을 만족하는 종목이 없습니다.");
        return;
    }

    println!(
        "\n{:<4} {:<12} {:>14} {:>8} {:>8} {:<8} {:>12} {:>8}",
        "#", "SYMBOL", "PRICE", "SCORE", "POT%", "VOLUME", "STOP", "TRAIL%"
    );
    println!("{}", "-".repeat(80));

    for (rank, record) in report.ranked.iter().enumerate() {
        println!(
            "{:<4} {:<12} {:>14} {:>8} {:>8} {:<8} {:>12} {:>8}",
            rank + 1,
            record.symbol.to_string(),
            record.last_price.to_string(),
            round_dp(record.score, 2).to_string(),
            round_dp(record.potential_pct, 2).to_string(),
            record.volume_tier.to_string(),
            record.stop_loss.to_string(),
            record.trailing_stop_pct.to_string(),
        );
    }

    match &report.best_pick {
        Some(best) => {
            println!(
                "\n최우선 종목: {} (점수 {}, 상승 여력 {}%)",
                best.symbol,
                round_dp(best.score, 2),
                round_dp(best.potential_pct, 2)
            );
        }
        None => println!("\n선정 정책을 만족하는 최우선 종목이 없습니다."),
    }

    println!(
        "\n유니버스 {}개 중 후보 {}개, 실패 {}개 ({:.1}초)",
        report.stats.total,
        report.stats.accepted,
        report.stats.failed,
        report.stats.elapsed.as_secs_f64()
    );
}

/// 임계 점수를 넘는 레코드를 텔레그램으로 알립니다.
///
/// 알림 실패는 경고 로그만 남기고 실행 결과에는 영향을 주지 않습니다.
async fn send_alerts(config: &AppConfig, report: &ScreenReport) {
    let mut manager = NotificationManager::new();
    manager.add_sender(TelegramSender::new(config.notification.telegram.clone()));

    if manager.enabled_count() == 0 {
        warn!("활성화된 알림 전송기가 없습니다");
        return;
    }

    let alerts: Vec<&OpportunityRecord> = report
        .ranked
        .iter()
        .filter(|r| r.score >= config.notification.min_score_alert)
        .collect();

    for &record in &alerts {
        if let Err(e) = manager.notify_opportunity(record).await {
            warn!(symbol = %record.symbol, error = %e, "알림 전송 실패");
        }
    }

    let summary = manager
        .notify_summary(
            report.stats.total,
            report.stats.accepted,
            alerts.len(),
            report.best_pick.as_ref().map(|r| r.symbol.clone()),
            report.stats.elapsed.as_secs_f64(),
        )
        .await;
    if let Err(e) = summary {
        warn!(error = %e, "요약 알림 전송 실패");
    }

    info!(alerts = alerts.len(), "알림 전송 완료");
}
