use crate::constants::*;
use crate::parse::{
    ListGrantsParser, ListQueuesParser, Message, QueueAttributesParser, ReceiveMessagesParser,
    StatusParser, TextValueParser, VisibilityTimeoutParser,
};
use crate::retry;
use crate::sign_request::RequestBuilder;
use crate::{Config, Credential};
use bytes::Bytes;
use http::Method;
use log::debug;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use quesign_core::{parse_xml, Error, HttpSend, Result, SignedRequest, XmlConsumer};
use std::collections::HashMap;
use std::sync::Arc;

/// Permissions held by one grantee, aggregated from the per-permission
/// records the service reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grantee {
    /// Grantee display name.
    pub display_name: String,
    /// Every permission this grantee holds on the queue.
    pub permissions: Vec<String>,
}

/// The queue service client.
///
/// Owns the credential, the request builder for both wire protocols, the
/// HTTP transport and the transient-fault signature list. Every operation is
/// a synchronous call: sign, send, parse, with at most one automatic replay
/// when the service reports a known-transient fault.
#[derive(Debug)]
pub struct Client {
    credential: Credential,
    builder: RequestBuilder,
    http: Arc<dyn HttpSend>,
    service_problems: Vec<String>,
}

impl Client {
    /// Create a client from a config and an HTTP transport.
    ///
    /// Fails with [`quesign_core::ErrorKind::ConfigInvalid`] when either half
    /// of the access key pair is missing or blank.
    pub fn new(config: Config, http: impl HttpSend) -> Result<Self> {
        let credential = Credential::new(
            config.access_key_id.as_deref().unwrap_or_default(),
            config.secret_access_key.as_deref().unwrap_or_default(),
        );
        if !credential.is_valid() {
            return Err(Error::config_invalid(
                "access keys are required to operate on the queue service",
            ));
        }

        let builder = RequestBuilder::new(&config.endpoint)?;
        debug!("new queue client for {}", config.endpoint);

        Ok(Self {
            credential,
            builder,
            http: Arc::new(http),
            service_problems: config.service_problems,
        })
    }

    //-----------------------------------------------------------------
    //      Queues
    //-----------------------------------------------------------------

    /// Create a new queue and return its address.
    pub fn create_queue(
        &self,
        queue_name: &str,
        default_visibility_timeout: Option<u64>,
    ) -> Result<String> {
        let req = self.builder.query(
            &self.credential,
            "CreateQueue",
            None,
            &[
                ("QueueName", Some(queue_name.to_string())),
                (
                    "DefaultVisibilityTimeout",
                    Some(
                        default_visibility_timeout
                            .unwrap_or(DEFAULT_VISIBILITY_TIMEOUT)
                            .to_string(),
                    ),
                ),
            ],
        )?;

        let mut parser = TextValueParser::new("QueueUrl");
        self.dispatch(&req, &mut parser)?;
        required(parser.result, "QueueUrl")
    }

    /// List queue addresses, optionally filtered by a name prefix.
    pub fn list_queues(&self, queue_name_prefix: Option<&str>) -> Result<Vec<String>> {
        let req = self.builder.query(
            &self.credential,
            "ListQueues",
            None,
            &[("QueueNamePrefix", queue_name_prefix.map(str::to_string))],
        )?;

        let mut parser = ListQueuesParser::default();
        self.dispatch(&req, &mut parser)?;
        Ok(parser.result)
    }

    /// Delete a queue. Unless `force_deletion` is set the queue must be empty.
    pub fn delete_queue(&self, queue_url: &str, force_deletion: bool) -> Result<bool> {
        self.query_status(
            "DeleteQueue",
            Some(queue_url),
            &[("ForceDeletion", Some(force_deletion.to_string()))],
        )
    }

    /// Delete a queue even if it still holds messages.
    pub fn force_delete_queue(&self, queue_url: &str) -> Result<bool> {
        self.delete_queue(queue_url, true)
    }

    /// Retrieve queue attributes; `attribute` defaults to `All`.
    pub fn get_queue_attributes(
        &self,
        queue_url: &str,
        attribute: Option<&str>,
    ) -> Result<HashMap<String, String>> {
        let req = self.builder.query(
            &self.credential,
            "GetQueueAttributes",
            Some(queue_url),
            &[("Attribute", Some(attribute.unwrap_or("All").to_string()))],
        )?;

        let mut parser = QueueAttributesParser::default();
        self.dispatch(&req, &mut parser)?;
        Ok(parser.result)
    }

    /// Set one queue attribute.
    pub fn set_queue_attributes(
        &self,
        queue_url: &str,
        attribute: &str,
        value: &str,
    ) -> Result<bool> {
        self.query_status(
            "SetQueueAttributes",
            Some(queue_url),
            &[
                ("Attribute", Some(attribute.to_string())),
                ("Value", Some(value.to_string())),
            ],
        )
    }

    /// Set the queue's visibility timeout in seconds.
    pub fn set_visibility_timeout(
        &self,
        queue_url: &str,
        visibility_timeout: Option<u64>,
    ) -> Result<bool> {
        self.query_status(
            "SetVisibilityTimeout",
            Some(queue_url),
            &[(
                "VisibilityTimeout",
                Some(
                    visibility_timeout
                        .unwrap_or(DEFAULT_VISIBILITY_TIMEOUT)
                        .to_string(),
                ),
            )],
        )
    }

    /// Retrieve the queue's visibility timeout in seconds.
    pub fn get_visibility_timeout(&self, queue_url: &str) -> Result<u64> {
        let req = self
            .builder
            .query(&self.credential, "GetVisibilityTimeout", Some(queue_url), &[])?;

        let mut parser = VisibilityTimeoutParser::default();
        self.dispatch(&req, &mut parser)?;
        required(parser.result, "VisibilityTimeout")
    }

    /// Approximate amount of messages in the queue.
    pub fn get_queue_length(&self, queue_url: &str) -> Result<u64> {
        let attributes = self.get_queue_attributes(queue_url, None)?;
        let count = attributes
            .get("ApproximateNumberOfMessages")
            .ok_or_else(|| {
                Error::response_invalid("response is missing ApproximateNumberOfMessages")
            })?;

        count.parse::<u64>().map_err(|e| {
            Error::response_invalid(format!("message count is not an integer: {count}"))
                .with_source(e)
        })
    }

    /// Queue address for a short queue name, if such a queue exists.
    ///
    /// A name that already contains a `/` is taken to be an address and is
    /// returned as is, without a wire call.
    pub fn queue_url_by_name(&self, queue_name: &str) -> Result<Option<String>> {
        if queue_name.contains('/') {
            return Ok(Some(queue_name.to_string()));
        }

        let queue_urls = self.list_queues(Some(queue_name))?;
        Ok(queue_urls
            .into_iter()
            .find(|url| queue_name_by_url(url) == queue_name))
    }

    /// Remove all visible messages by popping until the queue reads empty.
    pub fn clear_queue(&self, queue_url: &str) -> Result<()> {
        while self.pop_message(queue_url)?.is_some() {}
        Ok(())
    }

    /// Delete the queue, re-create it and restore its attributes.
    ///
    /// The fastest way to clear a big queue or one with invisible messages.
    pub fn force_clear_queue(&self, queue_url: &str) -> Result<()> {
        let queue_name = queue_name_by_url(queue_url).to_string();
        let attributes = self.get_queue_attributes(queue_url, None)?;

        self.force_delete_queue(queue_url)?;
        self.create_queue(&queue_name, None)?;
        // The service needs a moment after re-creation before attribute
        // changes stick; an empty attribute read settles it.
        self.get_queue_attributes(queue_url, None)?;
        for (attribute, value) in &attributes {
            self.set_queue_attributes(queue_url, attribute, value)?;
        }

        Ok(())
    }

    //-----------------------------------------------------------------
    //      Permissions
    //-----------------------------------------------------------------

    /// Grant a permission to a user identified by their registered email.
    ///
    /// Permission is one of `FULLCONTROL`, `RECEIVEMESSAGE`, `SENDMESSAGE`.
    pub fn add_grant(
        &self,
        queue_url: &str,
        grantee_email_address: &str,
        permission: Option<&str>,
    ) -> Result<bool> {
        self.query_status(
            "AddGrant",
            Some(queue_url),
            &[
                (
                    "Grantee.EmailAddress",
                    Some(grantee_email_address.to_string()),
                ),
                ("Permission", permission.map(str::to_string)),
            ],
        )
    }

    /// Retrieve the queue's grants, aggregated per grantee id.
    pub fn list_grants(
        &self,
        queue_url: &str,
        grantee_email_address: Option<&str>,
        permission: Option<&str>,
    ) -> Result<HashMap<String, Grantee>> {
        let req = self.builder.query(
            &self.credential,
            "ListGrants",
            Some(queue_url),
            &[
                (
                    "Grantee.EmailAddress",
                    grantee_email_address.map(str::to_string),
                ),
                ("Permission", permission.map(str::to_string)),
            ],
        )?;

        let mut parser = ListGrantsParser::default();
        self.dispatch(&req, &mut parser)?;

        // One grantee may hold up to one record per permission; fold them
        // into a single entry per id.
        let mut result: HashMap<String, Grantee> = HashMap::new();
        for grant in parser.result {
            let entry = result.entry(grant.id).or_default();
            entry.display_name = grant.display_name;
            entry.permissions.push(grant.permission);
        }

        Ok(result)
    }

    /// Revoke a permission. The grantee is identified by email address, or by
    /// grantee id when the value carries no `@`.
    pub fn remove_grant(
        &self,
        queue_url: &str,
        grantee_email_address_or_id: &str,
        permission: Option<&str>,
    ) -> Result<bool> {
        let grantee_key = if grantee_email_address_or_id.contains('@') {
            "Grantee.EmailAddress"
        } else {
            "Grantee.ID"
        };

        self.query_status(
            "RemoveGrant",
            Some(queue_url),
            &[
                (grantee_key, Some(grantee_email_address_or_id.to_string())),
                ("Permission", permission.map(str::to_string)),
            ],
        )
    }

    //-----------------------------------------------------------------
    //      Messages
    //-----------------------------------------------------------------

    /// Retrieve up to `number_of_messages` from the front of the queue.
    ///
    /// The service usually returns fewer messages than requested even when
    /// more are available. A count of zero short-circuits without a wire call.
    pub fn receive_messages(
        &self,
        queue_url: &str,
        number_of_messages: u64,
        visibility_timeout: Option<u64>,
    ) -> Result<Vec<Message>> {
        if number_of_messages == 0 {
            return Ok(Vec::new());
        }

        let req = self.builder.rest(
            &self.credential,
            Method::GET,
            &format!("{queue_url}/front"),
            &[
                ("NumberOfMessages", Some(number_of_messages.to_string())),
                (
                    "VisibilityTimeout",
                    visibility_timeout.map(|v| v.to_string()),
                ),
            ],
            None,
        )?;

        let mut parser = ReceiveMessagesParser::default();
        self.dispatch(&req, &mut parser)?;
        Ok(parser.result)
    }

    /// Read the first accessible message from the queue.
    pub fn receive_message(
        &self,
        queue_url: &str,
        visibility_timeout: Option<u64>,
    ) -> Result<Option<Message>> {
        let messages = self.receive_messages(queue_url, 1, visibility_timeout)?;
        Ok(messages.into_iter().next())
    }

    /// Peek a message by id without affecting its visibility.
    pub fn peek_message(&self, queue_url: &str, message_id: &str) -> Result<Option<Message>> {
        let id = utf8_percent_encode(message_id, NON_ALPHANUMERIC);
        let req = self.builder.rest(
            &self.credential,
            Method::GET,
            &format!("{queue_url}/{id}"),
            &[],
            None,
        )?;

        let mut parser = ReceiveMessagesParser::default();
        self.dispatch(&req, &mut parser)?;
        Ok(parser.result.into_iter().next())
    }

    /// Send a new message to the back of the queue and return its id.
    pub fn send_message(&self, queue_url: &str, message: &str) -> Result<String> {
        let req = self.builder.rest(
            &self.credential,
            Method::PUT,
            &format!("{queue_url}/back"),
            &[],
            Some(Bytes::copy_from_slice(message.as_bytes())),
        )?;

        let mut parser = TextValueParser::new("MessageId");
        self.dispatch(&req, &mut parser)?;
        required(parser.result, "MessageId")
    }

    /// Alias for [`Client::send_message`].
    pub fn push_message(&self, queue_url: &str, message: &str) -> Result<String> {
        self.send_message(queue_url, message)
    }

    /// Delete a message from the queue.
    pub fn delete_message(&self, queue_url: &str, message_id: &str) -> Result<bool> {
        self.query_status(
            "DeleteMessage",
            Some(queue_url),
            &[("MessageId", Some(message_id.to_string()))],
        )
    }

    /// Change the visibility timeout of one message.
    pub fn change_message_visibility(
        &self,
        queue_url: &str,
        message_id: &str,
        visibility_timeout: u64,
    ) -> Result<bool> {
        self.query_status(
            "ChangeMessageVisibility",
            Some(queue_url),
            &[
                ("MessageId", Some(message_id.to_string())),
                ("VisibilityTimeout", Some(visibility_timeout.to_string())),
            ],
        )
    }

    /// Retrieve and delete up to `number_of_messages` from the queue.
    pub fn pop_messages(&self, queue_url: &str, number_of_messages: u64) -> Result<Vec<Message>> {
        let messages = self.receive_messages(queue_url, number_of_messages, None)?;
        for message in &messages {
            self.delete_message(queue_url, &message.id)?;
        }
        Ok(messages)
    }

    /// Retrieve and delete the first accessible message from the queue.
    pub fn pop_message(&self, queue_url: &str) -> Result<Option<Message>> {
        let messages = self.pop_messages(queue_url, 1)?;
        Ok(messages.into_iter().next())
    }

    //-----------------------------------------------------------------
    //      Dispatch
    //-----------------------------------------------------------------

    /// Sign-free inner loop shared by every status-result operation.
    fn query_status(
        &self,
        action: &str,
        queue_url: Option<&str>,
        params: &[(&str, Option<String>)],
    ) -> Result<bool> {
        let req = self
            .builder
            .query(&self.credential, action, queue_url, params)?;

        let mut parser = StatusParser::default();
        self.dispatch(&req, &mut parser)?;
        required(parser.result, "StatusCode")
    }

    /// Send a signed request and feed the response through `parser`.
    ///
    /// On a failed response the fault is classified; a known-transient fault
    /// earns exactly one replay of the same signed bytes. A second failure,
    /// transient or not, surfaces as the error of that second response.
    fn dispatch<P: XmlConsumer>(&self, req: &SignedRequest, parser: &mut P) -> Result<()> {
        debug!("{} {}", req.method, req.uri);
        let resp = self.http.http_send(req.to_http()?)?;
        if resp.status().is_success() {
            return parse_xml(resp.body(), parser);
        }

        let fault = retry::extract_fault(&resp)?;
        if !retry::is_transient(&fault, &self.service_problems) {
            return Err(Error::service(fault));
        }

        debug!("transient service fault, replaying request: {fault}");
        let resp = self.http.http_send(req.to_http()?)?;
        if resp.status().is_success() {
            return parse_xml(resp.body(), parser);
        }

        Err(Error::service(retry::extract_fault(&resp)?))
    }
}

/// Short queue name from a queue address.
pub fn queue_name_by_url(queue_url: &str) -> &str {
    queue_url.rsplit('/').next().unwrap_or(queue_url)
}

fn required<T>(value: Option<T>, what: &str) -> Result<T> {
    value.ok_or_else(|| Error::response_invalid(format!("response is missing {what}")))
}
