//! Exchanges over a real loopback ZeroMQ transport.

use std::time::Duration;

use bytes::Bytes;
use framecat::{
    Assembler,
    Endpoint,
    Pattern,
    RelayStats,
    ZmqEndpoint,
    connect_or_bind,
    exchange,
    relay,
};
use rstest::rstest;
use zeromq::{PushSocket, Socket, SocketSend, ZmqMessage};

const LOOPBACK: &str = "tcp://127.0.0.1:0";
const DEADLINE: Duration = Duration::from_secs(10);

async fn bind(pattern: Pattern) -> ZmqEndpoint {
    connect_or_bind(pattern, LOOPBACK, true, "")
        .await
        .expect("bind loopback endpoint")
}

async fn connect(pattern: Pattern, address: &str) -> ZmqEndpoint {
    connect_or_bind(pattern, address, false, "")
        .await
        .expect("connect to loopback endpoint")
}

#[rstest]
#[case::hello(b"hello".to_vec())]
#[case::empty(Vec::new())]
#[case::several_chunks(vec![7_u8; 3 * 8192 + 11])]
#[tokio::test]
async fn push_to_pull_delivers_input(#[case] input: Vec<u8>) {
    let mut pull = bind(Pattern::Pull).await;
    let mut push = connect(Pattern::Push, pull.address()).await;

    let mut reader = input.as_slice();
    let mut unused = Vec::new();
    let sent = exchange(
        Pattern::Push,
        &mut push,
        &Assembler::default(),
        &mut reader,
        &mut unused,
    )
    .await
    .expect("push exchange");
    assert_eq!(sent.sent, Some(input.len()));

    let mut output = Vec::new();
    let stats = tokio::time::timeout(DEADLINE, relay(&mut pull, &mut output))
        .await
        .expect("message arrives")
        .expect("relay");

    assert_eq!(output, input);
    assert_eq!(
        stats,
        RelayStats {
            frames: 1,
            bytes: input.len(),
        }
    );

    push.close().await.expect("close push");
    pull.close().await.expect("close pull");
}

#[tokio::test]
async fn multipart_message_is_concatenated() {
    let mut pull = bind(Pattern::Pull).await;
    let mut push = PushSocket::new();
    push.connect(pull.address()).await.expect("connect raw push");

    let mut message = ZmqMessage::from(Bytes::from_static(b"multi"));
    message.push_back(Bytes::from_static(b"-"));
    message.push_back(Bytes::from_static(b"part"));
    push.send(message).await.expect("send multipart");

    let mut output = Vec::new();
    let stats = tokio::time::timeout(DEADLINE, relay(&mut pull, &mut output))
        .await
        .expect("message arrives")
        .expect("relay");

    assert_eq!(output, b"multi-part");
    assert_eq!(stats.frames, 3);
    assert!(!pull.more_frames_follow());
}

#[tokio::test]
async fn request_reply_round_trip() {
    let mut rep = bind(Pattern::Rep).await;
    let mut req = connect(Pattern::Req, rep.address()).await;

    req.send(Bytes::from_static(b"ping"))
        .await
        .expect("send request");

    let mut answer: &[u8] = b"pong";
    let mut asked = Vec::new();
    let summary = tokio::time::timeout(
        DEADLINE,
        exchange(
            Pattern::Rep,
            &mut rep,
            &Assembler::default(),
            &mut answer,
            &mut asked,
        ),
    )
    .await
    .expect("request arrives")
    .expect("reply exchange");
    assert_eq!(asked, b"ping");
    assert_eq!(summary.sent, Some(4));

    let mut reply = Vec::new();
    tokio::time::timeout(DEADLINE, relay(&mut req, &mut reply))
        .await
        .expect("reply arrives")
        .expect("relay reply");
    assert_eq!(reply, b"pong");
}

#[tokio::test]
async fn bound_push_waits_for_a_late_pull() {
    let mut push = bind(Pattern::Push).await;
    let address = push.address().to_owned();

    let sender = tokio::spawn(async move {
        let mut input: &[u8] = b"hello";
        let mut unused = Vec::new();
        let summary = exchange(
            Pattern::Push,
            &mut push,
            &Assembler::default(),
            &mut input,
            &mut unused,
        )
        .await;
        (summary, push)
    });

    tokio::time::sleep(Duration::from_millis(300)).await;
    let mut pull = connect(Pattern::Pull, &address).await;
    let mut output = Vec::new();
    tokio::time::timeout(DEADLINE, relay(&mut pull, &mut output))
        .await
        .expect("message arrives")
        .expect("relay");

    let (summary, push) = sender.await.expect("join sender");
    assert_eq!(summary.expect("push exchange").sent, Some(5));
    assert_eq!(output, b"hello");
    push.close().await.expect("close push");
}

#[tokio::test]
async fn bound_req_waits_for_a_late_rep() {
    let mut req = bind(Pattern::Req).await;
    let address = req.address().to_owned();

    let requester = tokio::spawn(async move {
        let mut question: &[u8] = b"ping";
        let mut reply = Vec::new();
        let summary = exchange(
            Pattern::Req,
            &mut req,
            &Assembler::default(),
            &mut question,
            &mut reply,
        )
        .await;
        (summary, reply)
    });

    tokio::time::sleep(Duration::from_millis(300)).await;
    let mut rep = connect(Pattern::Rep, &address).await;
    let mut answer: &[u8] = b"pong";
    let mut asked = Vec::new();
    tokio::time::timeout(
        DEADLINE,
        exchange(
            Pattern::Rep,
            &mut rep,
            &Assembler::default(),
            &mut answer,
            &mut asked,
        ),
    )
    .await
    .expect("request arrives")
    .expect("reply exchange");

    let (summary, reply) = tokio::time::timeout(DEADLINE, requester)
        .await
        .expect("reply arrives")
        .expect("join requester");
    assert_eq!(summary.expect("request exchange").sent, Some(4));
    assert_eq!(asked, b"ping");
    assert_eq!(reply, b"pong");
}

#[rstest]
#[case(Pattern::Push)]
#[case(Pattern::Pub)]
#[tokio::test]
async fn send_only_sockets_refuse_to_receive(#[case] pattern: Pattern) {
    let mut endpoint = bind(pattern).await;

    let err = endpoint
        .receive_frame()
        .await
        .expect_err("send-only socket cannot receive");

    assert!(err.to_string().contains("cannot receive"));
}

#[tokio::test]
async fn malformed_address_fails_setup() {
    let err = connect_or_bind(Pattern::Push, "not-an-endpoint", false, "")
        .await
        .expect_err("address must be rejected");

    assert!(err.to_string().contains("not-an-endpoint"));
}
