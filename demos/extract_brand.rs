use std::sync::Arc;

use brand_guideline_extractor::{
    BrandExtractor, ExtractionEvent, ExtractionRequest, ExtractorConfig, GeminiClient,
    GeminiConfig, JsonDirectoryStore, ReportStore,
};
use dotenv::dotenv;
use tokio::sync::mpsc;

// Simulated text pulled out of a brand book PDF
const MOCK_BRAND_DOC: &str = r#"
NORTHWIND COFFEE CO. BRAND BOOK (2024)

WHO WE ARE
Northwind started in 2012 as a two-person roastery on the harbour. We roast small batches, we
know our growers by name, and we'd rather explain a flavour than sell a buzzword.

HOW WE SOUND
Warm, knowledgeable, never snobby. Short sentences. Talk to one person, not a crowd.
We say "roasted", "origin", "brew". We never say "artisanal", "premium" or "game-changing".
  "Your morning, done properly."
  "Ask us anything. Seriously."

LOOK AND FEEL
Primary colours: Harbour Navy (#1B2A41), Crema (#F3E9DC)
Secondary: Copper (#B87333) for accents and calls to action only
Type: Source Serif for headlines (Semibold), Inter for body copy (Regular, Medium)
Photography: natural light, hands and process, no staged smiles.
Logo: keep clear space equal to the height of the "N". Never below 24px.

SOCIAL
Instagram: behind-the-roaster Reels, origin stories in carousels, #NorthwindRoasts on every post.
LinkedIn: grower partnerships and sustainability reports, more formal.
Reply to every question within a day. Never argue in comments.

RULES
Do: show the people behind the coffee. Do: explain the why.
Don't: use stock imagery. Don't: discount publicly.
"#;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    println!("🚀 Starting brand guideline extraction example...");

    let document = match std::env::args().nth(1) {
        Some(path) => {
            println!("📄 Reading document from {}", path);
            std::fs::read_to_string(path)?
        }
        None => MOCK_BRAND_DOC.to_string(),
    };

    let gemini = GeminiClient::new(GeminiConfig::from_env()?);
    println!("🤖 Using model {}", gemini.model());

    let extractor = BrandExtractor::new(Arc::new(gemini), ExtractorConfig::default());
    let request = ExtractionRequest::new(document, "Northwind Coffee Co.");

    let (tx, mut rx) = mpsc::channel(32);
    let progress = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                ExtractionEvent::Starting => println!("⏳ Running extraction passes..."),
                ExtractionEvent::PassStarted { category } => println!("   → {}", category),
                ExtractionEvent::RepairApplied { category, rules } => {
                    println!("   🔧 {} repaired with {:?}", category, rules)
                }
                ExtractionEvent::PassCompleted {
                    category,
                    confidence,
                } => println!("   ✅ {} ({:.2})", category, confidence),
                ExtractionEvent::Success => println!("🎉 Extraction complete"),
                ExtractionEvent::Failed { reason } => println!("❌ Extraction failed: {}", reason),
            }
        }
    });

    let result = extractor.extract(&request, Some(tx)).await;
    progress.await?;
    let report = result?;

    println!("\n🗣  Primary voice: {}", report.voice_and_tone.primary_voice);
    println!(
        "📊 Average confidence: {:.2}",
        report.extraction_metadata.average_confidence
    );

    let store = JsonDirectoryStore::new("brand_reports");
    store.save("northwind", &report).await?;
    println!("💾 Saved report to brand_reports/northwind.json");

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
