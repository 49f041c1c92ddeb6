//! End-to-end integration tests for the countdown auction.
//!
//! These tests exercise the full auction lifecycle through the shared engine
//! handle:
//! 1. Registration
//! 2. Session start
//! 3. Bidding
//! 4. Countdown close
//! 5. Deposit refunds

#[cfg(test)]
mod lifecycle {
    use auction_engine::{AuctionEngine, AuctionError, AuctionQuery, AuctionQueryResponse};
    use auction_types::{Address, AuctionEvent, Phase, Rule};

    fn account(i: u8) -> Address {
        [i + 1; 32]
    }

    /// Test the complete auction flow, one phase at a time.
    #[test]
    fn test_full_auction_flow() {
        let auctioneer = account(0);
        let engine = AuctionEngine::new(auctioneer, Rule::new(50, 5)).unwrap();

        // ========================================
        // Phase 1: Registration
        // ========================================

        assert_eq!(engine.rule(), Rule::new(50, 5));
        assert_eq!(engine.phase(), Phase::Created);

        engine.register(auctioneer, Some(account(1)), Some(100)).unwrap();
        assert_eq!(
            engine.register(account(1), Some(account(2)), Some(100)),
            Err(AuctionError::Unauthorized)
        );
        engine.register(auctioneer, Some(account(2)), Some(100)).unwrap();
        engine.register(auctioneer, Some(account(3)), Some(100)).unwrap();
        assert!(matches!(
            engine.register(auctioneer, None, None),
            Err(AuctionError::InvalidInput(_))
        ));

        // ========================================
        // Phase 2: Start the session
        // ========================================

        assert_eq!(
            engine.start_session(account(1)),
            Err(AuctionError::Unauthorized)
        );
        engine.start_session(auctioneer).unwrap();
        assert_eq!(engine.phase(), Phase::Started);

        // ========================================
        // Phase 3: Bidding
        // ========================================

        engine.bid(account(3), Some(55)).unwrap();
        engine.bid(account(1), Some(60)).unwrap();
        // account 5 was never registered
        assert_eq!(
            engine.bid(account(5), Some(65)),
            Err(AuctionError::Unauthorized)
        );
        engine.bid(account(2), Some(65)).unwrap();
        assert!(matches!(
            engine.bid(account(1), None),
            Err(AuctionError::InvalidInput(_))
        ));
        engine.bid(account(2), Some(70)).unwrap();
        let next = engine.current_price() + engine.rule().minimum_step;
        engine.bid(account(2), Some(next)).unwrap();
        assert_eq!(engine.current_price(), 75);

        // ========================================
        // Phase 4: Countdown
        // ========================================

        assert_eq!(
            engine.announce(account(1)),
            Err(AuctionError::Unauthorized)
        );
        engine.announce(auctioneer).unwrap();

        // A new bid gives the countdown fresh life
        engine.bid(account(1), Some(80)).unwrap();
        for _ in 0..3 {
            engine.announce(auctioneer).unwrap();
        }
        assert_eq!(engine.phase(), Phase::Started);
        engine.announce(auctioneer).unwrap();
        assert_eq!(engine.phase(), Phase::Closing);
        assert_eq!(engine.current_winner(), Some(account(1)));

        // Nothing moves the auction out of Closing
        assert!(engine.bid(account(2), Some(200)).is_err());
        assert!(engine.announce(auctioneer).is_err());
        assert!(engine.start_session(auctioneer).is_err());

        // ========================================
        // Phase 5: Refunds
        // ========================================

        assert_eq!(engine.get_deposit(account(2)), Ok(65 + 70 + 75));
        assert_eq!(
            engine.get_deposit(account(1)),
            Err(AuctionError::Unauthorized)
        );
        assert_eq!(engine.get_deposit(account(3)), Ok(55));
        assert_eq!(
            engine.get_deposit(account(3)),
            Err(AuctionError::NothingToWithdraw)
        );

        // The winner's escrow stays with the auction
        assert_eq!(engine.deposit_of(&account(1)), 60 + 80);
        assert_eq!(engine.summary().total_escrow, 140);

        let response = engine.query(AuctionQuery::Events {
            offset: 0,
            limit: u64::MAX,
        });
        let AuctionQueryResponse::Events(events) = response else {
            panic!("unexpected response");
        };
        assert!(events.contains(&AuctionEvent::Closed {
            winner: Some(account(1)),
            price: 80,
        }));
    }

    #[test]
    fn test_close_without_bids() {
        let auctioneer = account(0);
        let engine = AuctionEngine::new(auctioneer, Rule::default()).unwrap();
        engine.register(auctioneer, Some(account(1)), Some(10)).unwrap();
        engine.start_session(auctioneer).unwrap();

        for _ in 0..4 {
            engine.announce(auctioneer).unwrap();
        }

        assert_eq!(engine.phase(), Phase::Closing);
        assert_eq!(engine.current_winner(), None);
        assert_eq!(engine.current_price(), 50);
        assert_eq!(engine.get_deposit(account(1)), Ok(0));
    }

    #[test]
    fn test_resume_from_snapshot_mid_countdown() {
        let auctioneer = account(0);
        let engine = AuctionEngine::new(auctioneer, Rule::default()).unwrap();
        engine.register(auctioneer, Some(account(1)), Some(100)).unwrap();
        engine.register(auctioneer, Some(account(2)), Some(100)).unwrap();
        engine.start_session(auctioneer).unwrap();
        engine.bid(account(1), Some(55)).unwrap();
        engine.bid(account(2), Some(60)).unwrap();
        engine.announce(auctioneer).unwrap();
        engine.announce(auctioneer).unwrap();

        let resumed = AuctionEngine::restore(&engine.snapshot().unwrap()).unwrap();

        resumed.announce(auctioneer).unwrap();
        assert_eq!(resumed.phase(), Phase::Started);
        resumed.announce(auctioneer).unwrap();
        assert_eq!(resumed.phase(), Phase::Closing);
        assert_eq!(resumed.get_deposit(account(1)), Ok(55));
    }
}
