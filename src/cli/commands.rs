//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command. The quiz loops read
//! answers from any `BufRead` and write to any `Write` so they can be driven
//! from a terminal or a test.

use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;
use rand::Rng;

use crate::config::SonoraConfig;
use crate::engine::{export_wav, render, ExportFormat, PlotSeries, SynthProfile, WaveParameters};
use crate::error::Result;
use crate::quiz::{anatomy, quality, Category, Question, QuizState, Score};

use super::{GridArg, PlotFormat};

/// Render a tone at the playback rate to a WAV file.
pub fn render_wav(
    config: &SonoraConfig,
    params: &WaveParameters,
    output: &Path,
    bit_depth: Option<u16>,
    sample_rate: Option<u32>,
) -> Result<()> {
    let format = ExportFormat::new(
        sample_rate.unwrap_or(config.sample_rate),
        bit_depth.unwrap_or(config.bit_depth),
    );
    format.validate()?;

    let profile = SynthProfile::Playback {
        sample_rate: format.sample_rate,
    };
    let buffer = render(params, &profile)?;
    export_wav(&buffer, output, &format)?;

    println!(
        "Wrote {} ({} samples, {:.2}s at {} Hz, {}-bit)",
        output.display(),
        buffer.len(),
        params.duration,
        format.sample_rate,
        format.bit_depth
    );
    Ok(())
}

/// Render a tone at plotting density and write the series.
pub fn plot_series<W: Write>(
    config: &SonoraConfig,
    params: &WaveParameters,
    points: Option<usize>,
    grid: Option<GridArg>,
    format: PlotFormat,
    out: W,
) -> Result<()> {
    let mut profile = config.visual_profile();
    if let SynthProfile::Visual {
        points: config_points,
        grid: config_grid,
    } = &mut profile
    {
        *config_points = points.unwrap_or(*config_points);
        *config_grid = grid.map_or(*config_grid, Into::into);
    }
    let buffer = render(params, &profile)?;
    let series = PlotSeries::from_buffer(&buffer, params.harmonic);

    info!("plotting {} points ({})", series.len(), series.title);
    match format {
        PlotFormat::Csv => series.write_csv(out),
        PlotFormat::Json => series.write_json(out),
    }
}

/// Open the plot destination: a file, or stdout when no path is given.
pub fn plot_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(std::io::stdout().lock()),
    })
}

/// Run the ear-anatomy quiz for `rounds` questions.
///
/// Returns early with the score so far if the input ends.
pub fn anatomy_quiz<R: Rng + ?Sized, I: BufRead, W: Write>(
    rounds: u32,
    rng: &mut R,
    mut input: I,
    mut out: W,
) -> Result<Score> {
    writeln!(out, "Ear anatomy quiz: identify the numbered part of the ear.")?;
    let mut state = QuizState::new();

    for round in 1..=rounds {
        state = anatomy::generate_question(state, rng);
        let Some(question) = state.current() else {
            break;
        };

        writeln!(out)?;
        writeln!(out, "Question {}/{}: {}", round, rounds, question.prompt())?;
        let options: Vec<String> = question.options().into_iter().map(str::to_string).collect();
        print_options(&mut out, &options)?;

        let Some(line) = read_answer(&mut input, &mut out)? else {
            break;
        };
        state = anatomy::check_answer(&state, &resolve_answer(&line, &options))?;
        if let Some(feedback) = state.feedback() {
            writeln!(out, "{}", feedback)?;
        }
    }

    finish(&mut out, state.score())
}

/// Run the sound-quality quiz for `rounds` questions.
///
/// Each round's tone is written to `<clips_dir>/round-<n>.wav`. Answering
/// `r` rewrites the clip so it can be played again.
pub fn sound_quiz<R: Rng + ?Sized, I: BufRead, W: Write>(
    config: &SonoraConfig,
    rounds: u32,
    categories: &[Category],
    clips_dir: &Path,
    rng: &mut R,
    mut input: I,
    mut out: W,
) -> Result<Score> {
    std::fs::create_dir_all(clips_dir)?;
    let profile = config.playback_profile();
    let format = config.export_format();
    let categories = if categories.is_empty() {
        config.categories.as_slice()
    } else {
        categories
    };

    writeln!(out, "Sound quiz: listen carefully and describe the mystery sound.")?;
    let mut state = QuizState::new();

    for round in 1..=rounds {
        state = quality::generate_question(state, categories, config.clip_duration, rng)?;
        let Some(question) = state.current() else {
            break;
        };

        let clip = clip_path(clips_dir, round);
        export_wav(&question.render(&profile)?, &clip, &format)?;

        writeln!(out)?;
        writeln!(out, "Question {}/{}: play {}", round, rounds, clip.display())?;
        writeln!(
            out,
            "Quality to guess: {} ({})",
            question.category,
            question.category.quantity()
        )?;
        writeln!(out, "{}", question.prompt())?;
        let options: Vec<String> = question.options().into_iter().map(str::to_string).collect();
        print_options(&mut out, &options)?;
        writeln!(out, "  r) replay")?;

        let answer = loop {
            match read_answer(&mut input, &mut out)? {
                Some(line) if is_replay(&line) => {
                    export_wav(&question.render(&profile)?, &clip, &format)?;
                    writeln!(out, "Clip rewritten: {}", clip.display())?;
                }
                other => break other,
            }
        };
        let Some(line) = answer else {
            break;
        };

        state = quality::check_answer(&state, &resolve_answer(&line, &options))?;
        if let Some(feedback) = state.feedback() {
            writeln!(out, "{}", feedback)?;
        }
    }

    finish(&mut out, state.score())
}

/// Print the effective configuration as pretty JSON.
pub fn print_config<W: Write>(config: &SonoraConfig, mut out: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, config)?;
    writeln!(out)?;
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

fn clip_path(dir: &Path, round: u32) -> PathBuf {
    dir.join(format!("round-{}.wav", round))
}

fn is_replay(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "r" | "replay")
}

fn print_options<W: Write>(out: &mut W, options: &[String]) -> Result<()> {
    for (i, option) in options.iter().enumerate() {
        writeln!(out, "  {}) {}", i + 1, option)?;
    }
    Ok(())
}

/// Prompt for and read one non-empty line; `None` at end of input.
fn read_answer<I: BufRead, W: Write>(input: &mut I, out: &mut W) -> Result<Option<String>> {
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let line = line.trim();
        if !line.is_empty() {
            return Ok(Some(line.to_string()));
        }
    }
}

/// Map a 1-based option number to its text; anything else is taken verbatim.
fn resolve_answer(line: &str, options: &[String]) -> String {
    line.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| options.get(i))
        .cloned()
        .unwrap_or_else(|| line.to_string())
}

fn finish<W: Write>(out: &mut W, score: Score) -> Result<Score> {
    writeln!(out)?;
    writeln!(
        out,
        "Final score: {} ({:.0}%)",
        score,
        score.accuracy() * 100.0
    )?;
    Ok(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{import_wav, TimeGrid};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn options() -> Vec<String> {
        vec!["Low".to_string(), "High".to_string()]
    }

    #[test]
    fn test_resolve_answer_by_index() {
        assert_eq!(resolve_answer("2", &options()), "High");
        assert_eq!(resolve_answer("1", &options()), "Low");
    }

    #[test]
    fn test_resolve_answer_out_of_range_is_verbatim() {
        assert_eq!(resolve_answer("0", &options()), "0");
        assert_eq!(resolve_answer("3", &options()), "3");
        assert_eq!(resolve_answer("Loud", &options()), "Loud");
    }

    #[test]
    fn test_read_answer_skips_blank_lines() {
        let mut input = Cursor::new("\n  \nHigh\n");
        let mut out = Vec::new();
        assert_eq!(
            read_answer(&mut input, &mut out).unwrap(),
            Some("High".to_string())
        );
        assert_eq!(read_answer(&mut input, &mut out).unwrap(), None);
    }

    #[test]
    fn test_anatomy_quiz_scores_answers() {
        // Replay the same seed to learn the answers the quiz will ask for.
        let mut replay = StdRng::seed_from_u64(9);
        let mut answers = String::new();
        let mut state = QuizState::new();
        for _ in 0..3 {
            state = anatomy::generate_question(state, &mut replay);
            answers.push_str(state.current().unwrap().correct_answer());
            answers.push('\n');
            state = anatomy::check_answer(&state, "skip").unwrap();
        }

        let mut rng = StdRng::seed_from_u64(9);
        let mut out = Vec::new();
        let score = anatomy_quiz(3, &mut rng, Cursor::new(answers), &mut out).unwrap();

        assert_eq!(score, Score { correct: 3, answered: 3 });
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Final score: 3/3 (100%)"));
    }

    #[test]
    fn test_anatomy_quiz_stops_at_end_of_input() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut out = Vec::new();
        let score = anatomy_quiz(5, &mut rng, Cursor::new("1\n"), &mut out).unwrap();
        assert_eq!(score.answered, 1);
    }

    #[test]
    fn test_sound_quiz_writes_clips_and_replays() {
        let dir = tempdir().unwrap();
        let config = SonoraConfig::default();
        let mut rng = StdRng::seed_from_u64(12);
        let mut out = Vec::new();

        let score = sound_quiz(
            &config,
            2,
            &[Category::Pitch],
            dir.path(),
            &mut rng,
            Cursor::new("r\n1\n2\n"),
            &mut out,
        )
        .unwrap();

        assert_eq!(score.answered, 2);
        let clip = import_wav(&dir.path().join("round-1.wav")).unwrap();
        assert_eq!(clip.samples.len(), 44100);
        assert!(dir.path().join("round-2.wav").exists());

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Clip rewritten"));
        assert!(text.contains("How would you describe this sound's pitch?"));
    }

    #[test]
    fn test_plot_series_csv_point_count() {
        let config = SonoraConfig::default();
        let params = WaveParameters::new(10.0, 0.8, 1.0);
        let mut out = Vec::new();
        plot_series(&config, &params, Some(50), None, PlotFormat::Csv, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 51);
        assert!(text.lines().last().unwrap().starts_with("1,"));
    }

    #[test]
    fn test_plot_series_uses_config_grid_unless_overridden() {
        let config = SonoraConfig {
            visual_points: 4,
            visual_grid: TimeGrid::HalfOpen,
            ..SonoraConfig::default()
        };
        let params = WaveParameters::new(10.0, 0.8, 1.0);

        let mut out = Vec::new();
        plot_series(&config, &params, None, None, PlotFormat::Csv, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 5);
        assert!(text.lines().last().unwrap().starts_with("0.75,"));

        let mut out = Vec::new();
        plot_series(&config, &params, None, Some(GridArg::Closed), PlotFormat::Csv, &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.lines().last().unwrap().starts_with("1,"));
    }

    #[test]
    fn test_render_wav_overrides() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let params = WaveParameters::new(440.0, 0.5, 0.5);

        render_wav(&SonoraConfig::default(), &params, &path, Some(32), Some(8000)).unwrap();
        let decoded = import_wav(&path).unwrap();
        assert_eq!(decoded.sample_rate, 8000);
        assert_eq!(decoded.bit_depth, 32);
        assert_eq!(decoded.samples.len(), 4000);
    }

    #[test]
    fn test_render_wav_rejects_bad_depth() {
        let dir = tempdir().unwrap();
        let params = WaveParameters::new(440.0, 0.5, 0.5);
        let err = render_wav(
            &SonoraConfig::default(),
            &params,
            &dir.path().join("x.wav"),
            Some(8),
            None,
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
    }

    #[test]
    fn test_print_config() {
        let mut out = Vec::new();
        print_config(&SonoraConfig::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\"sample_rate\": 44100"));
    }
}
