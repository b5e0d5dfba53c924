use std::io::{self, Write};

use twentyone::game::{GameState, RoundOutcome, RoundPhase, BLACKJACK_SCORE, DEALER_STAND_SCORE};

/// Runs rounds until the player quits or runs out of cash. Input is read
/// line by line; `q` quits at any prompt.
pub fn play(game: &mut GameState) {
    println!("Welcome to Twenty-One. Type q at any prompt to quit.");
    println!("You begin with ${}", game.cash_balance());

    loop {
        if !prompt_bet(game) {
            return;
        }
        if let Err(e) = game.deal_initial_hands() {
            eprintln!("{}", e);
            return;
        }
        print_table(game);

        while game.phase() == RoundPhase::PlayerTurn {
            if game.player_hand().len() == 2 {
                println!("What would you like to do? Type 'stand', 'hit' or 'double'");
            } else {
                println!("What would you like to do? Type 'stand' or 'hit'");
            }
            let result = match read_line().as_str() {
                "hit" => game.player_hit(),
                "stand" => game.player_stand(),
                "double" => game.player_double(),
                "q" => return,
                _ => {
                    println!("That isn't a recognized command! Try again or type 'q' to quit");
                    continue;
                }
            };
            match result {
                Ok(()) => print_table(game),
                Err(e) => println!("{}", e),
            }
        }

        print_outcome(game);

        if game.cash_balance() == 0 {
            println!("You lost all your money!");
            return;
        }
        game.next_round().expect("the round has been settled");
    }
}

/// Prompts until a valid bet is placed. Returns false if the player quits.
fn prompt_bet(game: &mut GameState) -> bool {
    loop {
        print!("Please place your bet (up to ${}): ", game.cash_balance());
        io::stdout().flush().expect("failed to flush stdout");
        let input = read_line();
        if input == "q" {
            return false;
        }
        let amount = match input.parse::<u32>() {
            Ok(amount) => amount,
            Err(_) => {
                println!(
                    "{} is not a number between 1 and {}! Please re-enter your bet",
                    input,
                    game.cash_balance()
                );
                continue;
            }
        };
        match game.place_bet(amount) {
            Ok(()) => return true,
            Err(e) => println!("{}", e),
        }
    }
}

fn print_table(game: &GameState) {
    println!("{}", "_".repeat(40));
    println!(
        "Your cash: {} \t Current bet: {}",
        game.cash_balance(),
        game.current_bet()
    );

    let dealer = game.dealer_hand();
    print!("Dealer hand:");
    for (i, card) in dealer.hand().cards().iter().enumerate() {
        if i == 0 && !dealer.is_revealed() {
            print!(" |?|");
        } else {
            print!(" |{}|", card);
        }
    }
    if let Some(score) = game.dealer_score() {
        print!(" \t Score: {}", score);
    }
    println!();

    print!("Your hand:");
    for card in game.player_hand().cards() {
        print!(" |{}|", card);
    }
    println!(" \t Score: {}", game.player_score());
    println!("{}", "_".repeat(40));

    if game.phase() != RoundPhase::PlayerTurn {
        return;
    }
    let player_score = game.player_score();
    println!(
        "Probability that the dealer goes bust: {:.2}%",
        game.dealer_bust_probability()
    );
    if player_score >= DEALER_STAND_SCORE && player_score < BLACKJACK_SCORE {
        println!(
            "Probability that the dealer scores {} or more: {:.2}%",
            player_score,
            game.dealer_score_at_least_probability(player_score)
        );
    } else if player_score < DEALER_STAND_SCORE {
        println!(
            "Probability that the next hit brings your score to between 17 and 21: {:.2}%",
            game.next_hit_success_probability() * 100.0
        );
    }
    println!("{}", "_".repeat(40));
}

fn print_outcome(game: &GameState) {
    let bet = game.current_bet();
    match game.outcome() {
        Some(RoundOutcome::PlayerBlackjack) => println!("Blackjack! You win ${}", bet * 3 / 2),
        Some(RoundOutcome::DealerBlackjack) => println!("Dealer has Blackjack! You lost ${}", bet),
        Some(RoundOutcome::PlayerBust) => println!("You went bust! You lost ${}", bet),
        Some(RoundOutcome::DealerBust) => println!("Dealer went bust! You win ${}", bet),
        Some(RoundOutcome::PlayerWin) => println!("You won! You win ${}", bet),
        Some(RoundOutcome::DealerWin) => println!("The dealer won! You lost ${}", bet),
        Some(RoundOutcome::Push) => println!("Push: you are returned your ${}", bet),
        None => {}
    }
}

fn read_line() -> String {
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .expect("failed to read from stdin");
    line.trim().to_lowercase()
}
