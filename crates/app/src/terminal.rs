//! Line-based terminal front-end over `GameLoopService`.

use tokio::io::{AsyncBufReadExt, BufReader};

use quiz_core::model::{SessionKey, TravelMode};
use services::progression::{LandmarkView, ProgressView};
use services::{AnswerForm, GameError, GameLoopService, PlayView, parse_mode};

/// At or below this speed the passenger manages to photograph the landmark.
const PHOTO_SPEED_LIMIT: u16 = 120;

/// Run the interactive loop until stdin closes or the player quits.
///
/// # Errors
///
/// Returns an error for stdin or storage failures. Bad input and wrong-phase
/// requests are reported and the prompt is shown again.
pub async fn play(
    game: &GameLoopService,
    user: &SessionKey,
    preset: Option<TravelMode>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut view = match preset {
        Some(mode) => game.start(user, mode).await?,
        None => game.view(user).await?,
    };

    loop {
        render(&view);
        println!("{}", prompt(&view));

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        match line {
            "q" | "quit" => break,
            "menu" => {
                view = game.return_to_menu(user).await?;
                continue;
            }
            _ => {}
        }

        let next = match &view {
            PlayView::Menu(_) => match parse_mode(Some(line)) {
                Ok(mode) => game.start(user, mode).await,
                Err(err) => {
                    println!("! {err}");
                    continue;
                }
            },
            PlayView::InLeg(leg) => {
                let speed = leg.progress.speed.to_string();
                let photo = if leg.progress.speed <= PHOTO_SPEED_LIMIT {
                    "true"
                } else {
                    "false"
                };
                let form = AnswerForm::new(line)
                    .with_client_speed(&speed)
                    .with_landmark_acquired(photo);
                match form.parse() {
                    Ok(answer) => game.answer(user, answer).await,
                    Err(err) => {
                        println!("! {err}");
                        continue;
                    }
                }
            }
            PlayView::Judgement(_) => game.acknowledge(user).await,
            PlayView::Arrival(_) => game.depart(user).await,
            PlayView::Goal(_) => game.return_to_menu(user).await,
        };

        view = match next {
            Ok(next) => next,
            Err(GameError::Progression(err)) => {
                println!("! {err}");
                game.view(user).await?
            }
            Err(err) => return Err(err.into()),
        };
    }

    Ok(())
}

fn prompt(view: &PlayView) -> &'static str {
    match view {
        PlayView::Menu(_) => "Choose a service: normal | express   (q to quit)",
        PlayView::InLeg(_) => "Answer 1-5   (menu, q)",
        PlayView::Judgement(_) => "Press Enter to continue",
        PlayView::Arrival(_) => "Press Enter to depart",
        PlayView::Goal(_) => "Press Enter to return to the menu",
    }
}

fn render(view: &PlayView) {
    println!();
    match view {
        PlayView::Menu(menu) => {
            println!("=== RAIL QUIZ ===");
            if menu.degraded_pool {
                println!("(question set unavailable, running on a placeholder)");
            }
            println!(
                "{} questions on board, landmarks {}/{}",
                menu.total_questions,
                menu.collected.len(),
                menu.total_landmarks
            );
            for landmark in &menu.collected {
                println!("  * {}", describe_landmark(landmark));
            }
        }
        PlayView::InLeg(leg) => {
            render_progress(&leg.progress);
            println!(
                "Leg {}  question {}/{}",
                leg.leg_number, leg.leg_position, leg.leg_len
            );
            if let Some(landmark) = leg.landmark.as_ref().filter(|l| !l.collected) {
                println!(
                    "Ahead: {} (slow to {PHOTO_SPEED_LIMIT} km/h to capture it)",
                    describe_landmark(landmark)
                );
            }
            println!("[{}] {}", leg.question.id, leg.question.text);
            for (n, option) in leg.question.options.iter().enumerate() {
                println!("  {}. {option}", n + 1);
            }
        }
        PlayView::Judgement(judgement) => {
            render_progress(&judgement.progress);
            if judgement.correct {
                println!("Correct!");
            } else {
                println!(
                    "Wrong. The answer was: {}. It will come round again.",
                    judgement.correct_answer
                );
            }
            if let Some(landmark) = &judgement.landmark {
                println!("Landmark collected: {}", describe_landmark(landmark));
            }
        }
        PlayView::Arrival(arrival) => {
            render_progress(&arrival.progress);
            println!(
                "Arrived at {} after leg {}. {} fresh questions left.",
                arrival.arrived_station, arrival.leg_number, arrival.questions_left
            );
        }
        PlayView::Goal(goal) => {
            render_progress(&goal.progress);
            if goal.reached_terminal {
                println!("Terminal reached: {}!", goal.progress.current_station);
            } else {
                println!(
                    "Out of questions at {}. End of the line.",
                    goal.progress.current_station
                );
            }
            println!(
                "Landmarks collected: {}/{}",
                goal.collected.len(),
                goal.total_landmarks
            );
        }
    }
}

fn render_progress(progress: &ProgressView) {
    println!(
        "{} -> {}  [{}]  {} km/h  score {} ({} answered, {}% of deck)  route {}%",
        progress.current_station,
        progress.next_station,
        progress.mode,
        progress.speed,
        progress.score,
        progress.total_answered,
        progress.progress.percent(),
        progress.route_progress.percent(),
    );
}

fn describe_landmark(landmark: &LandmarkView) -> String {
    let kind = if landmark.is_tunnel { "tunnel" } else { "sight" };
    format!("{} near {} ({kind})", landmark.name, landmark.station_name)
}
