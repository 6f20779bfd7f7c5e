use clap::Parser;
use sheet_ai_common::{extract_with_tier, try_combine, CombinedSheets, Table};
use sheet_ai_rust::{analyzer, cli, config, error, export, reader, session};
use cli::{Cli, Commands};
use config::Config;
use error::{Result, SheetAiError};
use session::{Session, StoredResult};
use std::io::Read;
use std::path::{Path, PathBuf};

/// ブックを読み込んで立て積み
fn combine_workbook(input: &Path, verbose: bool) -> Result<CombinedSheets> {
    if !reader::is_supported(input) {
        eprintln!("⚠ 対応していない拡張子の可能性があります: {}", input.display());
    }

    let mut workbook = reader::WorkbookReader::open(input)?;
    if verbose {
        println!("  シート: {}", workbook.sheet_names().join(", "));
    }

    let combined = try_combine(workbook.sheets())?;

    if verbose {
        for summary in &combined.summaries {
            println!("  - {}: {}行", summary.label, summary.row_count);
        }
    }
    Ok(combined)
}

fn preview_table(table: &Table, max_rows: usize) -> Table {
    Table {
        columns: table.columns.clone(),
        rows: table.rows.iter().take(max_rows).cloned().collect(),
    }
}

fn read_instruction() -> Result<String> {
    dialoguer::Input::<String>::new()
        .with_prompt("分析指示を入力してください")
        .allow_empty(true)
        .interact_text()
        .map_err(|e| SheetAiError::Prompt(e.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    let session_dir = cli.session_dir.clone().unwrap_or_else(|| PathBuf::from("."));

    match cli.command {
        Commands::Convert { input, output, format, preview, no_session } => {
            println!("📊 sheet-ai - Excel立て積み変換\n");

            // 1. 読み込み・立て積み
            println!("[1/3] Excelファイルを処理中...");
            let combined = combine_workbook(&input, cli.verbose)?;
            println!(
                "✔ 処理完了: {} シート, {} 行\n",
                combined.sheet_count(),
                combined.total_rows()
            );

            println!("📝 生成されたMarkdownプレビュー:");
            println!("{}\n", export::preview_text(&combined.markdown, config.preview_chars));

            if preview {
                println!("📊 統合データプレビュー:");
                let head = preview_table(&combined.unified, config.preview_rows);
                println!("{}\n", sheet_ai_common::render_table(&head));
                if combined.total_rows() > config.preview_rows {
                    println!("最初の{}行を表示（全{}行）\n", config.preview_rows, combined.total_rows());
                }
            }

            // 2. エクスポート
            println!("[2/3] エクスポート中... (形式: {})", format);
            let output_dir = output.unwrap_or_else(|| PathBuf::from("."));
            let now = chrono::Local::now();
            for path in export::export_combined(&combined, &format, &output_dir, &now)? {
                println!("✔ 出力: {}", path.display());
            }
            println!();

            // 3. セッション保存
            if no_session {
                println!("[3/3] セッション保存をスキップ");
            } else {
                println!("[3/3] セッションを保存中...");
                let hash = session::compute_file_hash(&input)?;
                Session::new(&input, hash, combined).save(&session_dir)?;
                println!("✔ セッション保存: {}", Session::session_path(&session_dir).display());
            }

            println!("\n✅ 変換完了");
        }

        Commands::Analyze { input, instruction, full, output } => {
            println!("💬 sheet-ai - Gemini分析\n");

            // 1. データ準備
            println!("[1/3] データを準備中...");
            let mut current = match input {
                Some(path) => {
                    let reusable = Session::load(&session_dir)
                        .filter(|s| Path::new(&s.source_path) == path.as_path() && !s.is_stale(&path));
                    match reusable {
                        Some(session) => {
                            println!("✔ セッションのデータを再利用");
                            session
                        }
                        None => {
                            let combined = combine_workbook(&path, cli.verbose)?;
                            let hash = session::compute_file_hash(&path)?;
                            Session::new(&path, hash, combined)
                        }
                    }
                }
                None => Session::load(&session_dir).ok_or(SheetAiError::NoSession)?,
            };
            println!(
                "✔ {} シート, {} 行\n",
                current.combined.sheet_count(),
                current.combined.total_rows()
            );

            let instruction = match instruction {
                Some(text) => text,
                None => read_instruction()?,
            };
            if instruction.trim().is_empty() {
                return Err(SheetAiError::EmptyInstruction);
            }

            // 2. Gemini呼び出し
            println!("[2/3] Geminiで分析中...");
            let client = analyzer::GeminiClient::from_config(&config)?;
            let outcome = analyzer::analyze(
                &client,
                &current.combined.markdown,
                &instruction,
                &config.result_markers(),
                cli.verbose,
            )
            .await?;
            println!("✔ 分析完了\n");

            println!("🎯 分析結果");
            println!("{}\n", outcome.result);

            if full {
                println!("📝 完全な回答:");
                println!("{}\n", outcome.full_response);
            }

            // 3. 保存
            println!("[3/3] 結果を保存中...");
            let now = chrono::Local::now();
            current.record_result(StoredResult {
                instruction,
                result: outcome.result.clone(),
                full_response: outcome.full_response,
                analyzed_at: now.format("%Y-%m-%d %H:%M:%S").to_string(),
            });
            current.save(&session_dir)?;

            if let Some(dir) = output {
                let path = export::write_result_text(&outcome.result, &dir, &now)?;
                println!("✔ 結果を保存: {}", path.display());
            }

            println!("\n✅ 完了");
        }

        Commands::Extract { input } => {
            let mut text = String::new();
            if input.as_os_str() == "-" {
                std::io::stdin().read_to_string(&mut text)?;
            } else {
                if !input.exists() {
                    return Err(SheetAiError::FileNotFound(input.display().to_string()));
                }
                text = std::fs::read_to_string(&input)?;
            }

            let extraction = extract_with_tier(&text, &config.result_markers());
            if cli.verbose {
                eprintln!("抽出方法: {}", extraction.tier);
            }
            println!("{}", extraction.text);
        }

        Commands::ShowResult { output } => {
            let current = Session::load(&session_dir).ok_or(SheetAiError::NoSession)?;

            match current.last_result {
                Some(stored) => {
                    println!("📋 最新の分析結果\n");
                    println!("{}\n", stored.result);
                    println!("  指示: {}", stored.instruction);
                    println!("  分析日時: {}", stored.analyzed_at);

                    if let Some(dir) = output {
                        let path = export::write_result_text(&stored.result, &dir, &chrono::Local::now())?;
                        println!("✔ 結果を保存: {}", path.display());
                    }
                }
                None => println!("分析結果がありません。`sheet-ai analyze` を実行してください"),
            }
        }

        Commands::Session { clear, info } => {
            let session_path = Session::session_path(&session_dir);

            if info || !clear {
                // デフォルトまたは--info: 情報表示
                match Session::load(&session_dir) {
                    Some(current) => {
                        println!("セッション情報:");
                        println!("  パス: {}", session_path.display());
                        println!("  変換元: {}", current.source_path);
                        println!("  シート: {}", current.combined.labels.join(", "));
                        println!("  総データ件数: {} 行", current.combined.total_rows());
                        println!(
                            "  分析結果: {}",
                            current.last_result.as_ref().map(|r| r.analyzed_at.as_str()).unwrap_or("なし")
                        );
                        if Path::new(&current.source_path).exists()
                            && current.is_stale(Path::new(&current.source_path))
                        {
                            println!("  ⚠ 変換元ファイルが更新されています");
                        }
                    }
                    None => println!("セッションファイルが存在しません: {}", session_path.display()),
                }
            }

            if clear {
                match Session::clear(&session_dir) {
                    Ok(true) => println!("✔ セッションを削除しました: {}", session_path.display()),
                    Ok(false) => println!("セッションファイルが存在しません"),
                    Err(e) => eprintln!("セッション削除エラー: {}", e),
                }
            }
        }

        Commands::Config { set_api_key, set_model, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if let Some(model) = set_model {
                config.set_model(model)?;
                println!("✔ モデルを設定しました");
            }

            if show {
                println!("設定:");
                println!("  モデル: {}", config.model);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  結果マーカー: {}", config.result_markers().as_slice().join(" "));
                println!("  APIキー: {}", if config.get_api_key().is_ok() { "設定済み" } else { "未設定" });
                println!("  設定ファイル: {}", Config::config_path()?.display());
            }
        }
    }

    Ok(())
}
