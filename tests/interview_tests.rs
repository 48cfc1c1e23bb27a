// Integration tests for the interview state machine
//
// These tests drive interviews through the facilitator and directly through
// `Interview`, checking turn accounting, completion, persistence and the
// behaviour around closed sessions and failing gateway calls.

mod common;

use alignment_facilitator::interview::FALLBACK_QUESTION;
use alignment_facilitator::{
    Facilitator, FacilitatorError, Interview, InterviewStep, OfflineGateway, SessionRegistry,
    SessionStatus, TranscriptStatus, TranscriptStore, Turn,
};
use anyhow::Result;
use common::{facilitator, temp_store, ScriptedGateway};
use std::sync::atomic::Ordering;
use std::sync::Arc;

#[tokio::test]
async fn test_q4_priorities_scenario() -> Result<()> {
    let (_dir, _gateway, store, facilitator) = facilitator(5);

    facilitator.start_session("Q4 priorities").await?;
    let view = facilitator.begin_interview(None).await?;
    assert_eq!(view.turn_count, 0);
    assert_eq!(view.status, TranscriptStatus::InProgress);
    assert_eq!(view.question.as_deref(), Some("What does 'Q4 priorities' mean to you?"));

    let answers = ["yes", "growth", "hiring", "tools", "done"];
    let mut last = None;
    for (i, answer) in answers.iter().enumerate() {
        let step = facilitator.submit_answer(&view.interview_id, answer).await?;
        if i < answers.len() - 1 {
            assert_eq!(
                step,
                InterviewStep::NextQuestion {
                    question: format!("Question {}", i + 2)
                }
            );
        }
        last = Some(step);
    }

    assert_eq!(
        last,
        Some(InterviewStep::Completed {
            record_id: view.interview_id.clone()
        })
    );

    let stored = store.list_completed()?;
    assert_eq!(stored.len(), 1);
    let transcript = &stored[0];
    assert_eq!(transcript.id, view.interview_id);
    assert_eq!(transcript.topic, "Q4 priorities");
    assert_eq!(transcript.turn_count(), 5);
    assert_eq!(transcript.status, TranscriptStatus::Completed);
    let stored_answers: Vec<&str> = transcript.turns.iter().map(|t| t.answer.as_str()).collect();
    assert_eq!(stored_answers, answers);
    assert_eq!(transcript.turns[0].question, "What does 'Q4 priorities' mean to you?");
    assert_eq!(transcript.turns[4].question, "Question 5");

    Ok(())
}

#[tokio::test]
async fn test_sixth_answer_is_rejected() -> Result<()> {
    let (_dir, _gateway, store, facilitator) = facilitator(5);
    facilitator.start_session("Tooling").await?;
    let view = facilitator.begin_interview(None).await?;

    for answer in ["a", "b", "c", "d", "e"] {
        facilitator.submit_answer(&view.interview_id, answer).await?;
    }

    let err = facilitator
        .submit_answer(&view.interview_id, "one more")
        .await
        .unwrap_err();
    assert!(matches!(err, FacilitatorError::AlreadyCompleted(id) if id == view.interview_id));

    // Still exactly one record with five turns
    let stored = store.list_completed()?;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].turn_count(), 5);
    Ok(())
}

#[tokio::test]
async fn test_interview_completes_after_exactly_max_turns() -> Result<()> {
    let (_dir, store) = temp_store();
    let gateway = ScriptedGateway::new();
    let registry = SessionRegistry::new();
    let handle = registry.start_session("Team communication").await?;
    let session = registry.lookup(handle).await?;

    let mut interview = Interview::begin(&session, gateway.as_ref(), 5).await?;

    for n in 1..=4 {
        let step = interview
            .submit_answer(&format!("answer {}", n), gateway.as_ref(), store.as_ref())
            .await?;
        assert!(matches!(step, InterviewStep::NextQuestion { .. }));
        assert_eq!(interview.transcript().turn_count(), n);
        assert!(!interview.is_completed());
        assert!(store.list_completed()?.is_empty(), "nothing saved before completion");
    }

    let step = interview
        .submit_answer("answer 5", gateway.as_ref(), store.as_ref())
        .await?;
    assert!(matches!(step, InterviewStep::Completed { .. }));
    assert!(interview.is_completed());
    assert!(interview.pending_question().is_none());
    assert!(interview.transcript().completed_at.is_some());

    let err = interview
        .submit_answer("answer 6", gateway.as_ref(), store.as_ref())
        .await
        .unwrap_err();
    assert!(matches!(err, FacilitatorError::AlreadyCompleted(_)));
    assert_eq!(interview.transcript().turn_count(), 5);

    Ok(())
}

#[tokio::test]
async fn test_turn_order_survives_storage_for_every_length() -> Result<()> {
    for max_turns in 1..=5 {
        let (_dir, _gateway, store, facilitator) = facilitator(max_turns);
        facilitator.start_session("Ordering").await?;
        let view = facilitator.begin_interview(None).await?;

        let answers: Vec<String> = (0..max_turns).map(|i| format!("answer #{}", i)).collect();
        for answer in &answers {
            facilitator.submit_answer(&view.interview_id, answer).await?;
        }

        let stored = store
            .load(&view.interview_id)?
            .expect("completed transcript should be stored");
        let stored_answers: Vec<String> = stored.turns.iter().map(|t| t.answer.clone()).collect();
        assert_eq!(stored_answers, answers, "max_turns = {}", max_turns);
    }
    Ok(())
}

#[tokio::test]
async fn test_next_question_request_carries_full_history() -> Result<()> {
    let (_dir, gateway, _store, facilitator) = facilitator(4);
    facilitator.start_session("Hiring").await?;
    let view = facilitator.begin_interview(None).await?;

    for answer in ["first", "second", "third"] {
        facilitator.submit_answer(&view.interview_id, answer).await?;
    }

    let histories = gateway.histories.lock().unwrap().clone();
    assert_eq!(histories.len(), 3);
    assert_eq!(
        histories[2],
        vec![
            Turn::new("What does 'Hiring' mean to you?", "first"),
            Turn::new("Question 2", "second"),
            Turn::new("Question 3", "third"),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_empty_model_output_falls_back_to_generic_question() -> Result<()> {
    let (_dir, gateway, _store, facilitator) = facilitator(5);
    gateway.empty_questions.store(true, Ordering::SeqCst);

    facilitator.start_session("Remote work").await?;
    let view = facilitator.begin_interview(None).await?;
    assert_eq!(view.question.as_deref(), Some(FALLBACK_QUESTION));

    let step = facilitator.submit_answer(&view.interview_id, "it works").await?;
    assert_eq!(
        step,
        InterviewStep::NextQuestion {
            question: FALLBACK_QUESTION.to_string()
        }
    );
    Ok(())
}

#[tokio::test]
async fn test_gateway_failure_leaves_interview_untouched() -> Result<()> {
    let (_dir, gateway, _store, facilitator) = facilitator(5);
    facilitator.start_session("Budget").await?;
    let view = facilitator.begin_interview(None).await?;
    facilitator.submit_answer(&view.interview_id, "tight").await?;

    gateway.fail_next_question.store(true, Ordering::SeqCst);
    let err = facilitator
        .submit_answer(&view.interview_id, "very tight")
        .await
        .unwrap_err();
    assert!(matches!(err, FacilitatorError::Gateway(_)));

    let after = facilitator.interview(&view.interview_id).await?;
    assert_eq!(after.turn_count, 1);
    assert_eq!(after.question.as_deref(), Some("Question 2"));

    // Retrying the same answer succeeds once the gateway recovers
    facilitator.submit_answer(&view.interview_id, "very tight").await?;
    let after = facilitator.interview(&view.interview_id).await?;
    assert_eq!(after.turn_count, 2);
    assert_eq!(after.turns[1], Turn::new("Question 2", "very tight"));
    Ok(())
}

#[tokio::test]
async fn test_empty_answer_is_rejected() -> Result<()> {
    let (_dir, _gateway, _store, facilitator) = facilitator(5);
    facilitator.start_session("Values").await?;
    let view = facilitator.begin_interview(None).await?;

    let err = facilitator
        .submit_answer(&view.interview_id, "  \n")
        .await
        .unwrap_err();
    assert!(matches!(err, FacilitatorError::EmptyAnswer));
    assert_eq!(facilitator.interview(&view.interview_id).await?.turn_count, 0);
    Ok(())
}

#[tokio::test]
async fn test_begin_requires_an_open_session() -> Result<()> {
    let (_dir, _gateway, _store, facilitator) = facilitator(5);

    let err = facilitator.begin_interview(None).await.unwrap_err();
    assert!(matches!(err, FacilitatorError::NoActiveSession));

    facilitator.start_session("Launch").await?;
    facilitator.close_session().await;
    let err = facilitator.begin_interview(None).await.unwrap_err();
    assert!(matches!(err, FacilitatorError::NoActiveSession));
    Ok(())
}

#[tokio::test]
async fn test_superseded_session_cannot_start_interviews() -> Result<()> {
    let (_dir, _gateway, _store, facilitator) = facilitator(5);

    let first = facilitator.start_session("A").await?;
    let in_flight = facilitator.begin_interview(Some(first.handle())).await?;
    facilitator.start_session("B").await?;

    let old = facilitator.session(first.handle()).await?;
    assert_eq!(old.status, SessionStatus::Closed);

    let err = facilitator
        .begin_interview(Some(first.handle()))
        .await
        .unwrap_err();
    assert!(matches!(err, FacilitatorError::SessionClosed(id) if id == first.id));

    // An interview that was already running under A carries on
    facilitator.submit_answer(&in_flight.interview_id, "still here").await?;

    let current = facilitator.begin_interview(None).await?;
    assert_eq!(current.topic, "B");
    Ok(())
}

#[tokio::test]
async fn test_begin_against_closed_session_value() -> Result<()> {
    let gateway = ScriptedGateway::new();
    let registry = SessionRegistry::new();
    let handle = registry.start_session("Closed topic").await?;
    registry.close_session().await;
    let session = registry.lookup(handle).await?;

    let err = Interview::begin(&session, gateway.as_ref(), 5).await.unwrap_err();
    assert!(matches!(err, FacilitatorError::SessionClosed(_)));
    Ok(())
}

#[tokio::test]
async fn test_offline_gateway_surfaces_error_on_begin() -> Result<()> {
    let (_dir, store) = temp_store();
    let facilitator = Facilitator::new(Arc::new(OfflineGateway::new("OPENAI_API_KEY")), store, 5);
    facilitator.start_session("Anything").await?;

    let err = facilitator.begin_interview(None).await.unwrap_err();
    match err {
        FacilitatorError::Gateway(e) => assert!(e.message.contains("OPENAI_API_KEY")),
        other => panic!("expected gateway error, got {:?}", other),
    }
    assert_eq!(facilitator.statistics().await?.interviews_in_progress, 0);
    Ok(())
}

#[tokio::test]
async fn test_abandoned_interview_is_not_saved() -> Result<()> {
    let (_dir, _gateway, store, facilitator) = facilitator(5);
    facilitator.start_session("Process").await?;
    let view = facilitator.begin_interview(None).await?;
    facilitator.submit_answer(&view.interview_id, "slow").await?;

    facilitator.abandon_interview(&view.interview_id).await?;

    assert!(store.list_completed()?.is_empty());
    let err = facilitator
        .submit_answer(&view.interview_id, "more")
        .await
        .unwrap_err();
    assert!(matches!(err, FacilitatorError::UnknownInterview(_)));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_answers_to_one_interview_are_serialized() -> Result<()> {
    let (_dir, gateway, _store, facilitator) = facilitator(5);
    gateway.slow_questions.store(true, Ordering::SeqCst);
    let facilitator = Arc::new(facilitator);
    facilitator.start_session("Concurrency").await?;
    let view = facilitator.begin_interview(None).await?;

    let handles: Vec<_> = ["left", "right"]
        .into_iter()
        .map(|answer| {
            let facilitator = Arc::clone(&facilitator);
            let id = view.interview_id.clone();
            tokio::spawn(async move { facilitator.submit_answer(&id, answer).await })
        })
        .collect();
    for handle in handles {
        handle.await??;
    }

    // The second gateway call must see the turn committed by the first
    let mut histories = gateway.histories.lock().unwrap().clone();
    histories.sort_by_key(Vec::len);
    assert_eq!(histories.len(), 2);
    assert_eq!(histories[0].len(), 1);
    assert_eq!(histories[1].len(), 2);
    assert_eq!(histories[1][0], histories[0][0]);

    let after = facilitator.interview(&view.interview_id).await?;
    assert_eq!(after.turn_count, 2);
    assert_ne!(after.turns[0].answer, after.turns[1].answer);
    assert_eq!(after.turns[1].question, "Question 2");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_separate_interviews_proceed_concurrently() -> Result<()> {
    let (_dir, gateway, _store, facilitator) = facilitator(5);
    gateway.slow_questions.store(true, Ordering::SeqCst);
    let facilitator = Arc::new(facilitator);
    facilitator.start_session("Concurrency").await?;
    let first = facilitator.begin_interview(None).await?;
    let second = facilitator.begin_interview(None).await?;

    let handles: Vec<_> = [(first.interview_id.clone(), "north"), (second.interview_id.clone(), "south")]
        .into_iter()
        .map(|(id, answer)| {
            let facilitator = Arc::clone(&facilitator);
            tokio::spawn(async move { facilitator.submit_answer(&id, answer).await })
        })
        .collect();
    for handle in handles {
        handle.await??;
    }

    assert_eq!(facilitator.interview(&first.interview_id).await?.turns[0].answer, "north");
    assert_eq!(facilitator.interview(&second.interview_id).await?.turns[0].answer, "south");
    Ok(())
}

#[tokio::test]
async fn test_answers_are_stored_verbatim() -> Result<()> {
    let (_dir, _gateway, store, facilitator) = facilitator(2);
    facilitator.start_session("Q4 priorities").await?;
    let view = facilitator.begin_interview(None).await?;

    let answers = ["  growth, mostly\n", "hiring\n\n- more engineers\n"];
    for answer in answers {
        facilitator.submit_answer(&view.interview_id, answer).await?;
    }

    let stored = store.load(&view.interview_id)?.expect("completed record");
    let stored_answers: Vec<&str> = stored.turns.iter().map(|t| t.answer.as_str()).collect();
    assert_eq!(stored_answers, answers);
    Ok(())
}

#[tokio::test]
async fn test_completed_interview_is_served_from_store() -> Result<()> {
    let (_dir, _gateway, _store, facilitator) = facilitator(1);
    facilitator.start_session("Onboarding").await?;
    let view = facilitator.begin_interview(None).await?;
    facilitator.submit_answer(&view.interview_id, "too long").await?;

    let after = facilitator.interview(&view.interview_id).await?;
    assert_eq!(after.status, TranscriptStatus::Completed);
    assert_eq!(after.turn_count, 1);
    assert!(after.question.is_none());
    assert_eq!(after.turns[0].answer, "too long");

    let err = facilitator.interview("interview_missing").await.unwrap_err();
    assert!(matches!(err, FacilitatorError::UnknownInterview(_)));
    Ok(())
}

#[tokio::test]
async fn test_zero_max_turns_is_raised_to_one() -> Result<()> {
    let (_dir, store) = temp_store();
    let gateway = ScriptedGateway::new();
    let registry = SessionRegistry::new();
    let session = registry.lookup(registry.start_session("Culture").await?).await?;

    let mut interview = Interview::begin(&session, gateway.as_ref(), 0).await?;
    assert_eq!(interview.transcript().max_turns, 1);

    let step = interview
        .submit_answer("only answer", gateway.as_ref(), store.as_ref())
        .await?;
    assert!(matches!(step, InterviewStep::Completed { .. }));
    let stored = &store.list_completed()?[0];
    assert!(stored.turn_count() <= stored.max_turns);
    Ok(())
}
